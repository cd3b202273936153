use crate::error::{DBError, NotFoundError, ServiceError};
use crate::models::{DocumentStore, PotClaim};
use smartpot_core::error::ValidationError;
use smartpot_core::{ChatId, PotId, RegistrationOutcome};
use std::sync::Arc;
use tracing::{debug, info};

/// Ownership of pots by accounts and the image of each pot
pub struct Registry {
    store: Arc<dyn DocumentStore>,
}

impl Registry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Registry { store }
    }

    /// Binds `pot_id` to `chat_id`
    ///
    /// Repeating a registration is a no-op. A pot already bound to another
    /// account is refused and nothing is written.
    pub async fn register(
        &self,
        chat_id: ChatId,
        pot_id: PotId,
    ) -> Result<RegistrationOutcome, ServiceError> {
        match self.store.add_pot(chat_id, pot_id).await? {
            PotClaim::Created => {
                info!("Inserted new user: {} with pot: {}", chat_id, pot_id);
                Ok(RegistrationOutcome::Created)
            }
            PotClaim::Added => {
                info!("Added pot_id {} to user {}", pot_id, chat_id);
                Ok(RegistrationOutcome::Added)
            }
            PotClaim::AlreadyAssociated => {
                debug!("Pot_id {} already associated with user {}", pot_id, chat_id);
                Ok(RegistrationOutcome::AlreadyAssociated)
            }
            PotClaim::ClaimedBy(_) => Err(ValidationError::PotClaimed(pot_id).into()),
        }
    }

    /// The ownership check gating every pot scoped operation
    pub async fn is_owned(&self, pot_id: PotId) -> Result<bool, DBError> {
        Ok(self.owner(pot_id).await?.is_some())
    }

    pub async fn owner(&self, pot_id: PotId) -> Result<Option<ChatId>, DBError> {
        self.store.owner_of(pot_id).await
    }

    pub async fn owner_pots(&self, chat_id: ChatId) -> Result<Vec<PotId>, ServiceError> {
        self.store
            .pots_of(chat_id)
            .await?
            .ok_or_else(|| NotFoundError::Account(chat_id).into())
    }

    pub async fn associate_image(&self, pot_id: PotId, url: &str) -> Result<(), DBError> {
        self.store.upsert_image(pot_id, url).await
    }

    pub async fn image_url(&self, pot_id: PotId) -> Result<String, ServiceError> {
        self.store
            .image_url(pot_id)
            .await?
            .ok_or_else(|| NotFoundError::Image(pot_id).into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::MemoryDocumentStore;

    fn build_registry() -> (Registry, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        (Registry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let (registry, _) = build_registry();

        let first = registry.register(1, 10).await.unwrap();
        let second = registry.register(1, 10).await.unwrap();

        assert_eq!(RegistrationOutcome::Created, first);
        assert_eq!(RegistrationOutcome::AlreadyAssociated, second);
        assert_eq!(vec![10], registry.owner_pots(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_owner_pots_is_a_set() {
        let (registry, _) = build_registry();

        for pot_id in [30, 10, 20, 10, 30] {
            registry.register(1, pot_id).await.unwrap();
        }

        assert_eq!(vec![10, 20, 30], registry.owner_pots(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_owned_after_register() {
        let (registry, _) = build_registry();
        assert!(!registry.is_owned(10).await.unwrap());

        registry.register(1, 10).await.unwrap();
        assert!(registry.is_owned(10).await.unwrap());

        registry.register(1, 11).await.unwrap();
        registry.register(2, 12).await.unwrap();
        registry.register(1, 10).await.unwrap();
        for pot_id in [10, 11, 12] {
            assert!(registry.is_owned(pot_id).await.unwrap());
        }
        assert_eq!(Some(2), registry.owner(12).await.unwrap());
    }

    #[tokio::test]
    async fn test_first_registrant_keeps_pot() {
        let (registry, _) = build_registry();
        registry.register(1, 10).await.unwrap();

        let res = registry.register(2, 10).await;

        assert!(matches!(
            res,
            Err(ServiceError::Validation(ValidationError::PotClaimed(10)))
        ));
        assert_eq!(Some(1), registry.owner(10).await.unwrap());
        assert!(matches!(
            registry.owner_pots(2).await,
            Err(ServiceError::NotFound(NotFoundError::Account(2)))
        ));
    }

    #[tokio::test]
    async fn test_image_url_upsert() {
        let (registry, _) = build_registry();
        assert!(matches!(
            registry.image_url(10).await,
            Err(ServiceError::NotFound(NotFoundError::Image(10)))
        ));

        registry.associate_image(10, "https://cdn/a").await.unwrap();
        registry.associate_image(10, "https://cdn/b").await.unwrap();

        assert_eq!("https://cdn/b", registry.image_url(10).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_failure_is_not_ownership() {
        let (registry, store) = build_registry();
        registry.register(1, 10).await.unwrap();
        store.set_available(false);

        assert!(registry.is_owned(10).await.is_err());
        assert!(matches!(
            registry.register(1, 11).await,
            Err(ServiceError::Dependency(_))
        ));
    }
}
