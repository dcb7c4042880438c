//! Image store backed by a local directory.
//!
//! Files are written under a random UUID name and served back by the
//! router's static file service at `public_prefix`.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use catalog_core::errors::ImageError;
use catalog_core::images::{ImageStoreTrait, ImageUpload, StoredImage};
use catalog_core::Result;

/// Extensions accepted from clients.
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

pub struct LocalImageStore {
    root: PathBuf,
    public_prefix: String,
    max_bytes: usize,
}

/// Detects the image format from its leading bytes.
fn sniff_format(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("jpg"),
        [b'G', b'I', b'F', b'8', ..] => Some("gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        _ => None,
    }
}

/// Image ids are bare file names; anything that could escape the root is refused.
fn is_safe_image_id(image_id: &str) -> bool {
    !image_id.is_empty()
        && !image_id.starts_with('.')
        && image_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    fn validate(&self, image: &ImageUpload) -> std::result::Result<&'static str, ImageError> {
        if image.is_empty() {
            return Err(ImageError::Empty);
        }
        if image.bytes.len() > self.max_bytes {
            return Err(ImageError::TooLarge {
                size: image.bytes.len(),
                limit: self.max_bytes,
            });
        }
        if let Some(ext) = image.extension() {
            if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
                return Err(ImageError::UnsupportedFormat(ext));
            }
        }
        sniff_format(&image.bytes).ok_or_else(|| {
            ImageError::UnsupportedFormat(
                image
                    .content_type
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        })
    }
}

#[async_trait]
impl ImageStoreTrait for LocalImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<StoredImage> {
        let format = self.validate(&image)?;

        tokio::fs::create_dir_all(&self.root).await?;
        let image_id = format!("{}.{}", Uuid::new_v4(), format);
        let path = self.root.join(&image_id);
        tokio::fs::write(&path, &image.bytes).await?;

        info!("Stored image {} ({} bytes)", image_id, image.bytes.len());
        Ok(StoredImage {
            url: format!("{}/{}", self.public_prefix, image_id),
            image_id,
        })
    }

    async fn delete(&self, image_id: &str) -> Result<bool> {
        if !is_safe_image_id(image_id) {
            return Err(ImageError::Io(format!("Invalid image id '{}'", image_id)).into());
        }
        match tokio::fs::remove_file(self.root.join(image_id)).await {
            Ok(()) => {
                debug!("Deleted image {}", image_id);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
