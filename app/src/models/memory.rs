use super::{DocumentStore, PotClaim};
use crate::error::DBError;
use async_trait::async_trait;
use parking_lot::RwLock;
use smartpot_core::{ChatId, PotId, Reading};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

/// Document store kept in process memory
///
/// Used for tests and local development. All state sits behind one lock, so
/// each trait method is atomic just like a single statement on postgres.
pub struct MemoryDocumentStore {
    state: RwLock<MemoryState>,
    available: AtomicBool,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<ChatId, BTreeSet<PotId>>,
    owners: HashMap<PotId, ChatId>,
    images: HashMap<PotId, String>,
    readings: HashMap<PotId, Vec<Reading>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        MemoryDocumentStore {
            state: RwLock::new(MemoryState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates an unreachable store, every call fails while unset
    #[cfg(test)]
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), DBError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DBError::Unavailable("memory store switched off".to_owned()))
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn add_pot(&self, chat_id: ChatId, pot_id: PotId) -> Result<PotClaim, DBError> {
        self.ensure_available()?;
        let mut state = self.state.write();

        if let Some(owner) = state.owners.get(&pot_id) {
            return Ok(if *owner == chat_id {
                PotClaim::AlreadyAssociated
            } else {
                PotClaim::ClaimedBy(*owner)
            });
        }

        let created = !state.users.contains_key(&chat_id);
        state.users.entry(chat_id).or_default().insert(pot_id);
        state.owners.insert(pot_id, chat_id);
        Ok(if created {
            PotClaim::Created
        } else {
            PotClaim::Added
        })
    }

    async fn owner_of(&self, pot_id: PotId) -> Result<Option<ChatId>, DBError> {
        self.ensure_available()?;
        Ok(self.state.read().owners.get(&pot_id).copied())
    }

    async fn pots_of(&self, chat_id: ChatId) -> Result<Option<Vec<PotId>>, DBError> {
        self.ensure_available()?;
        Ok(self
            .state
            .read()
            .users
            .get(&chat_id)
            .map(|pots| pots.iter().copied().collect()))
    }

    async fn upsert_image(&self, pot_id: PotId, url: &str) -> Result<(), DBError> {
        self.ensure_available()?;
        self.state.write().images.insert(pot_id, url.to_owned());
        Ok(())
    }

    async fn image_url(&self, pot_id: PotId) -> Result<Option<String>, DBError> {
        self.ensure_available()?;
        Ok(self.state.read().images.get(&pot_id).cloned())
    }

    async fn insert_reading(&self, reading: &Reading) -> Result<(), DBError> {
        self.ensure_available()?;
        self.state
            .write()
            .readings
            .entry(reading.pot_id)
            .or_default()
            .push(reading.clone());
        Ok(())
    }

    async fn latest_readings(&self, pot_id: PotId, limit: usize) -> Result<Vec<Reading>, DBError> {
        self.ensure_available()?;
        let state = self.state.read();
        Ok(state
            .readings
            .get(&pot_id)
            .map(|readings| readings.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn count_readings(&self, pot_id: PotId) -> Result<i64, DBError> {
        self.ensure_available()?;
        let state = self.state.read();
        Ok(state.readings.get(&pot_id).map(Vec::len).unwrap_or(0) as i64)
    }

    async fn check(&self) -> Result<(), DBError> {
        self.ensure_available()
    }

    async fn close(&self) {}
}
