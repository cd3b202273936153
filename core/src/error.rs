use crate::PotId;
use thiserror::Error;

/// Rejected client input, rendered verbatim to the caller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid pot ID format: \"{0}\". Must be an integer.")]
    InvalidPotId(String),
    #[error("Invalid account ID format: \"{0}\". Must be an integer.")]
    InvalidAccountId(String),
    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),
    #[error("Missing required key(s) in JSON payload: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid limit \"{0}\". Must be an integer between 1 and {1}.")]
    InvalidLimit(String, usize),
    #[error("Image payload is empty")]
    EmptyImage,
    #[error("Pot ID {0} is already registered to another user.")]
    PotClaimed(PotId),
}

impl ValidationError {
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            ValidationError::MissingFields(fields) => fields,
            _ => &[],
        }
    }
}
