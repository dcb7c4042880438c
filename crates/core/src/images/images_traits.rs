use async_trait::async_trait;

use crate::Result;

use super::{ImageUpload, StoredImage};

/// External store that holds category images.
#[async_trait]
pub trait ImageStoreTrait: Send + Sync {
    /// Stores the image and returns where it can be fetched from.
    async fn upload(&self, image: ImageUpload) -> Result<StoredImage>;

    /// Removes a previously stored image. Returns `false` when the id was unknown.
    async fn delete(&self, image_id: &str) -> Result<bool>;
}
