use serde::{Deserialize, Serialize};

/// Raw image payload received from a client.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    /// Original file name as sent by the client, used only for its extension.
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lower-cased file extension, if the file name carries one.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Result of storing an image: a public URL and the store's own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub url: String,
    pub image_id: String,
}
