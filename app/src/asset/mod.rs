use crate::config::{AssetBackend, Config};
use crate::error::AssetError;
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub mod cloudinary;
pub mod memory;

pub use cloudinary::CloudinaryAssetStore;
pub use memory::MemoryAssetStore;

/// 1x1 white png, seeded as the image of every freshly registered pot
const PLACEHOLDER_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGP4//8/AAX+Av4N70a4AAAAAElFTkSuQmCC";

/// Blob storage handing out stable public urls
#[async_trait]
pub trait AssetStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Stores `bytes` under `public_id`, overwriting earlier uploads, and returns its url
    async fn upload(&self, public_id: &str, bytes: Bytes) -> Result<String, AssetError>;

    /// Downloads an uploaded asset, `None` if the store does not serve it
    async fn fetch(&self, url: &str) -> Result<Option<Bytes>, AssetError>;
}

/// Opens the asset store selected by the config
pub fn connect(config: &Config) -> Result<Arc<dyn AssetStore>, AssetError> {
    match config.asset_backend() {
        AssetBackend::Cloudinary(cloudinary) => {
            info!("Uploading assets to cloudinary cloud {}", cloudinary.cloud_name);
            Ok(Arc::new(CloudinaryAssetStore::new(
                cloudinary.clone(),
                config.asset_timeout(),
            )?))
        }
        AssetBackend::Memory => {
            warn!("Using in-memory asset store, images are lost on shutdown");
            Ok(Arc::new(MemoryAssetStore::new()))
        }
    }
}

/// The placeholder image, read from `path` if given
pub fn default_image(path: Option<&Path>) -> Result<Bytes, AssetError> {
    match path {
        Some(path) => Ok(Bytes::from(std::fs::read(path)?)),
        None => base64::engine::general_purpose::STANDARD
            .decode(PLACEHOLDER_PNG_B64)
            .map(Bytes::from)
            .map_err(|e| AssetError::Unavailable(format!("corrupt placeholder: {}", e))),
    }
}

/// Guesses the mime type of an image from its magic number
pub fn content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}
