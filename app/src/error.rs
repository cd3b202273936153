use smartpot_core::error::ValidationError;
use smartpot_core::{ChatId, PotId};
use std::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(#[from] sqlx::Error),
    #[error(transparent)]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Store unavailable: {0}")]
    Unavailable(std::string::String),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Upload of {0} rejected with status {1}: {2}")]
    Rejected(std::string::String, u16, std::string::String),
    #[error("Asset store unavailable: {0}")]
    Unavailable(std::string::String),
    #[error("Failed reading default image: {0}")]
    DefaultImage(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} is invalid: {1}")]
    Invalid(&'static str, std::string::String),
}

/// Lookups on pots and accounts the caller may not see
///
/// An unknown pot and a pot of someone else render identically.
#[derive(Debug, Error)]
pub enum NotFoundError {
    #[error("Pot ID {0} not associated with any user.")]
    Pot(PotId),
    #[error("User {0} not found.")]
    Account(ChatId),
    #[error("Image for pot ID {0} not found.")]
    Image(PotId),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Dependency(Box<dyn error::Error + Send + Sync>),
}

impl From<DBError> for ServiceError {
    fn from(err: DBError) -> Self {
        ServiceError::Dependency(Box::from(err))
    }
}

impl From<AssetError> for ServiceError {
    fn from(err: AssetError) -> Self {
        ServiceError::Dependency(Box::from(err))
    }
}
