//! Images module - storage contract for category images.

mod images_model;
mod images_traits;

pub use images_model::{ImageUpload, StoredImage};
pub use images_traits::ImageStoreTrait;
