use crate::asset::AssetStore;
use crate::error::{NotFoundError, ServiceError};
use crate::models::DocumentStore;
use bytes::Bytes;
use chrono_tz::Tz;
use smartpot_core::error::ValidationError;
use smartpot_core::{
    decode_json, parse_chat_id, parse_pot_id, parse_window, PotId, ReadingMessage,
    ReadingPayload, RegisterPayload, RegistrationOutcome,
};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, error, info};

pub mod registry;
pub mod sensor_log;

#[cfg(test)]
pub(crate) mod mock;

pub use registry::Registry;
pub use sensor_log::SensorLog;

/// An image as served to clients
pub struct PotImage {
    pub content_type: &'static str,
    pub bytes: Bytes,
}

pub struct HealthState {
    pub store: &'static str,
    pub store_state: String,
    pub asset_store: &'static str,
}

impl HealthState {
    pub fn is_healthy(&self) -> bool {
        self.store_state == "ok"
    }
}

/// Entry point for every request
///
/// Parses raw identifiers and payloads, runs the ownership check and
/// delegates to the registry, the sensor log and the asset store.
pub struct PotService {
    registry: Registry,
    sensor_log: SensorLog,
    store: Arc<dyn DocumentStore>,
    assets: Arc<dyn AssetStore>,
    default_image: Bytes,
    readings_window: usize,
}

impl Debug for PotService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PotService")
            .field("store", &self.store.name())
            .field("assets", &self.assets.name())
            .finish()
    }
}

impl PotService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        assets: Arc<dyn AssetStore>,
        default_image: Bytes,
        timezone: Tz,
        readings_window: usize,
    ) -> Arc<Self> {
        Arc::new(PotService {
            registry: Registry::new(store.clone()),
            sensor_log: SensorLog::new(store.clone(), timezone),
            store,
            assets,
            default_image,
            readings_window,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn sensor_log(&self) -> &SensorLog {
        &self.sensor_log
    }

    /// Registers a pot for an account and seeds its placeholder image
    ///
    /// A repeated registration only seeds when the pot has no image yet, so
    /// retrying a failed registration converges and uploaded photos are kept.
    #[tracing::instrument(skip(self, body))]
    pub async fn register_pot(
        &self,
        content_type: Option<String>,
        body: Bytes,
    ) -> Result<RegistrationOutcome, ServiceError> {
        let payload: RegisterPayload = decode_json(content_type.as_deref(), &body)?;
        let (chat_id, pot_id) = payload.validate()?;

        let outcome = self.registry.register(chat_id, pot_id).await?;
        if outcome == RegistrationOutcome::AlreadyAssociated && self.has_image(pot_id).await? {
            return Ok(outcome);
        }

        let url = self
            .assets
            .upload(&pot_id.to_string(), self.default_image.clone())
            .await?;
        self.registry.associate_image(pot_id, &url).await?;

        debug!("Seeded default image for pot {}: {}", pot_id, url);
        Ok(outcome)
    }

    /// Uploads a new image for a pot, replacing the current one
    #[tracing::instrument(skip(self, body), fields(size = body.len()))]
    pub async fn upload_image(&self, raw_id: &str, body: Bytes) -> Result<String, ServiceError> {
        let pot_id = self.authorize(raw_id).await?;
        if body.is_empty() {
            return Err(ValidationError::EmptyImage.into());
        }

        let url = self.assets.upload(&pot_id.to_string(), body).await?;
        self.registry.associate_image(pot_id, &url).await?;

        info!("Uploaded image for pot {}", pot_id);
        Ok(url)
    }

    #[tracing::instrument(skip(self))]
    pub async fn image(&self, raw_id: &str) -> Result<PotImage, ServiceError> {
        let pot_id = self.authorize(raw_id).await?;
        let url = self.registry.image_url(pot_id).await?;

        let bytes = self
            .assets
            .fetch(&url)
            .await?
            .ok_or(NotFoundError::Image(pot_id))?;
        Ok(PotImage {
            content_type: crate::asset::content_type(&bytes),
            bytes,
        })
    }

    /// Appends a reading
    ///
    /// The id is validated, then ownership, then the payload. A malformed id
    /// never reaches the store.
    #[tracing::instrument(skip(self, body))]
    pub async fn insert_reading(
        &self,
        raw_id: &str,
        content_type: Option<String>,
        body: Bytes,
    ) -> Result<(), ServiceError> {
        let pot_id = self.authorize(raw_id).await?;

        let payload: ReadingPayload = decode_json(content_type.as_deref(), &body)?;
        let values = payload.validate()?;

        self.sensor_log.append(pot_id, values).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn readings(
        &self,
        raw_id: &str,
        limit: Option<&str>,
    ) -> Result<Vec<ReadingMessage>, ServiceError> {
        let pot_id = self.authorize(raw_id).await?;
        let limit = parse_window(limit, self.readings_window)?;

        Ok(self.sensor_log.recent(pot_id, limit).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn user_pots(&self, raw_id: &str) -> Result<Vec<PotId>, ServiceError> {
        let chat_id = parse_chat_id(raw_id)?;
        self.registry.owner_pots(chat_id).await
    }

    pub async fn health(&self) -> HealthState {
        let store_state = match self.store.check().await {
            Ok(_) => "ok".to_owned(),
            Err(e) => {
                error!("Document store check failed: {}", e);
                e.to_string()
            }
        };

        HealthState {
            store: self.store.name(),
            store_state,
            asset_store: self.assets.name(),
        }
    }

    async fn has_image(&self, pot_id: PotId) -> Result<bool, ServiceError> {
        match self.registry.image_url(pot_id).await {
            Ok(_) => Ok(true),
            Err(ServiceError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Parses a pot id and checks that some account owns it
    async fn authorize(&self, raw_id: &str) -> Result<PotId, ServiceError> {
        let pot_id = parse_pot_id(raw_id)?;
        if !self.registry.is_owned(pot_id).await? {
            return Err(NotFoundError::Pot(pot_id).into());
        }
        Ok(pot_id)
    }
}
