use crate::PotId;
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single (ph, soil) measurement as exchanged with clients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReadingMessage {
    pub ph: f64,
    pub soil: f64,
}

/// Wall-clock time of a reading, minute granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct ReadingTimestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl ReadingTimestamp {
    pub fn from_datetime<T: TimeZone>(dt: &DateTime<T>) -> Self {
        ReadingTimestamp {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }
}

/// A persisted reading; never updated once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub pot_id: PotId,
    pub timestamp: ReadingTimestamp,
    pub ph: f64,
    pub soil: f64,
}

impl From<Reading> for ReadingMessage {
    fn from(val: Reading) -> Self {
        ReadingMessage {
            ph: val.ph,
            soil: val.soil,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The account did not exist and was created with this pot
    Created,
    /// The pot was added to an existing account
    Added,
    /// The account already owned this pot, nothing changed
    AlreadyAssociated,
}

impl RegistrationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationOutcome::Created => "User saved successfully",
            RegistrationOutcome::Added => "Pot added to user",
            RegistrationOutcome::AlreadyAssociated => "Pot already associated with user",
        }
    }
}
