use crate::error::DBError;
use crate::models::DocumentStore;
use chrono::Utc;
use chrono_tz::Tz;
use smartpot_core::{PotId, Reading, ReadingMessage, ReadingTimestamp};
use std::sync::Arc;

/// Append only time series of readings per pot
pub struct SensorLog {
    store: Arc<dyn DocumentStore>,
    timezone: Tz,
}

impl SensorLog {
    pub fn new(store: Arc<dyn DocumentStore>, timezone: Tz) -> Self {
        SensorLog { store, timezone }
    }

    /// Appends a reading stamped with the current wall-clock time
    ///
    /// Callers have to check ownership of `pot_id` first.
    pub async fn append(&self, pot_id: PotId, values: ReadingMessage) -> Result<Reading, DBError> {
        let now = Utc::now().with_timezone(&self.timezone);
        let reading = Reading {
            pot_id,
            timestamp: ReadingTimestamp::from_datetime(&now),
            ph: values.ph,
            soil: values.soil,
        };
        self.store.insert_reading(&reading).await?;
        Ok(reading)
    }

    /// The newest `limit` readings, oldest first
    pub async fn recent(&self, pot_id: PotId, limit: usize) -> Result<Vec<ReadingMessage>, DBError> {
        let mut latest = self.store.latest_readings(pot_id, limit).await?;
        latest.reverse();
        Ok(latest.drain(..).map(ReadingMessage::from).collect())
    }

    pub async fn count(&self, pot_id: PotId) -> Result<i64, DBError> {
        self.store.count_readings(pot_id).await
    }
}
