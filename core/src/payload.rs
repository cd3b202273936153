use crate::error::ValidationError;
use crate::{ChatId, PotId, ReadingMessage};
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /insert/data/{id}`
///
/// Both keys are declared optional so a missing key is reported by name
/// instead of as a generic decoding error.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ReadingPayload {
    pub ph: Option<f64>,
    pub soil: Option<f64>,
}

impl ReadingPayload {
    pub fn validate(self) -> Result<ReadingMessage, ValidationError> {
        match (self.ph, self.soil) {
            (Some(ph), Some(soil)) => Ok(ReadingMessage { ph, soil }),
            (ph, soil) => {
                let mut missing = Vec::with_capacity(2);
                if ph.is_none() {
                    missing.push("ph");
                }
                if soil.is_none() {
                    missing.push("soil");
                }
                Err(ValidationError::MissingFields(missing))
            }
        }
    }
}

/// Body of `POST /insert/user`
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterPayload {
    pub chat_id: Option<ChatId>,
    pub pot_id: Option<PotId>,
}

impl RegisterPayload {
    pub fn validate(self) -> Result<(ChatId, PotId), ValidationError> {
        match (self.chat_id, self.pot_id) {
            (Some(chat_id), Some(pot_id)) => Ok((chat_id, pot_id)),
            (chat_id, pot_id) => {
                let mut missing = Vec::with_capacity(2);
                if chat_id.is_none() {
                    missing.push("chat_id");
                }
                if pot_id.is_none() {
                    missing.push("pot_id");
                }
                Err(ValidationError::MissingFields(missing))
            }
        }
    }
}

/// Decodes a JSON request body
///
/// The content type has to be `application/json` (parameters such as the
/// charset are ignored) and the body has to be a JSON object decoding into `T`.
pub fn decode_json<T: DeserializeOwned>(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<T, ValidationError> {
    let is_json = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Err(ValidationError::InvalidPayload(
            "missing or incorrect Content-Type header (must be application/json)".to_owned(),
        ));
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ValidationError::InvalidPayload(e.to_string()))?;
    let object = match value {
        Value::Object(object) => object,
        _ => {
            return Err(ValidationError::InvalidPayload(
                "expected a JSON object".to_owned(),
            ))
        }
    };

    serde_json::from_value(Value::Object(object))
        .map_err(|e| ValidationError::InvalidPayload(e.to_string()))
}
