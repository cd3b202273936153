use super::PotService;
use crate::asset::{self, MemoryAssetStore};
use crate::models::MemoryDocumentStore;
use std::sync::Arc;

pub(crate) struct MockedService {
    pub service: Arc<PotService>,
    pub store: Arc<MemoryDocumentStore>,
    pub assets: Arc<MemoryAssetStore>,
}

pub(crate) fn build_mocked_service() -> MockedService {
    let store = Arc::new(MemoryDocumentStore::new());
    let assets = Arc::new(MemoryAssetStore::new());
    let default_image = asset::default_image(None).unwrap();
    let service = PotService::new(
        store.clone(),
        assets.clone(),
        default_image,
        chrono_tz::UTC,
        smartpot_core::DEFAULT_READINGS_WINDOW,
    );

    MockedService {
        service,
        store,
        assets,
    }
}
