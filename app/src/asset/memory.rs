use super::AssetStore;
use crate::error::AssetError;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

const URL_PREFIX: &str = "memory://assets/";

/// Asset store kept in process memory
///
/// Urls carry an upload counter (`memory://assets/<id>?v=<n>`) so overwrites
/// are observable, fetching ignores it and serves the latest bytes.
pub struct MemoryAssetStore {
    assets: RwLock<HashMap<String, Bytes>>,
    uploads: AtomicUsize,
    available: AtomicBool,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        MemoryAssetStore {
            assets: RwLock::new(HashMap::new()),
            uploads: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    #[cfg(test)]
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn forget(&self, public_id: &str) {
        self.assets.write().remove(public_id);
    }

    fn public_id(url: &str) -> Option<&str> {
        let id = url.strip_prefix(URL_PREFIX)?;
        Some(id.split('?').next().unwrap_or(id))
    }
}

impl Default for MemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn upload(&self, public_id: &str, bytes: Bytes) -> Result<String, AssetError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AssetError::Unavailable("memory store switched off".to_owned()));
        }

        self.assets.write().insert(public_id.to_owned(), bytes);
        let version = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{}{}?v={}", URL_PREFIX, public_id, version))
    }

    async fn fetch(&self, url: &str) -> Result<Option<Bytes>, AssetError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AssetError::Unavailable("memory store switched off".to_owned()));
        }

        Ok(Self::public_id(url).and_then(|id| self.assets.read().get(id).cloned()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_overwrite() {
        let store = MemoryAssetStore::new();

        let first = store.upload("7", Bytes::from_static(b"one")).await.unwrap();
        let second = store.upload("7", Bytes::from_static(b"two")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(Some(Bytes::from_static(b"two")), store.fetch(&first).await.unwrap());
        assert_eq!(None, store.fetch("memory://assets/8").await.unwrap());
        assert_eq!(None, store.fetch("https://elsewhere/7").await.unwrap());
        assert_eq!(2, store.upload_count());
    }
}
