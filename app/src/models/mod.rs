use crate::config::{Config, StoreBackend};
use crate::error::DBError;
use async_trait::async_trait;
use smartpot_core::{ChatId, PotId, Reading};
use std::sync::Arc;
use tracing::{info, warn};

macro_rules! sql_stmnt {
    ($ret:ident, $stmt:expr) => {
        sqlx::query_as::<_, $ret>($stmt)
    };
    ($stmt:expr) => {
        sqlx::query($stmt)
    };
    ($ret:ident, $stmt:expr, $($bind:expr),*) => {
        sqlx::query_as::<_, $ret>($stmt)$(.bind($bind))*
    };
    ($stmt:expr, $($bind:expr),*) => {
        sqlx::query($stmt)$(.bind($bind))*
    };
}

pub mod image;
pub mod memory;
pub mod postgres;
pub mod reading;
pub mod user;

#[cfg(test)]
mod test;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Result of adding a pot to an account's pot set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotClaim {
    /// The account was created holding just this pot
    Created,
    Added,
    AlreadyAssociated,
    /// The pot belongs to another account, nothing was written
    ClaimedBy(ChatId),
}

/// Typed collection operations the service runs against
///
/// Every method is a single atomic step on the backing store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Adds `pot_id` to the pot set of `chat_id`, creating the account if needed
    async fn add_pot(&self, chat_id: ChatId, pot_id: PotId) -> Result<PotClaim, DBError>;

    async fn owner_of(&self, pot_id: PotId) -> Result<Option<ChatId>, DBError>;

    /// Pot ids of an account in ascending order, `None` for unknown accounts
    async fn pots_of(&self, chat_id: ChatId) -> Result<Option<Vec<PotId>>, DBError>;

    async fn upsert_image(&self, pot_id: PotId, url: &str) -> Result<(), DBError>;

    async fn image_url(&self, pot_id: PotId) -> Result<Option<String>, DBError>;

    async fn insert_reading(&self, reading: &Reading) -> Result<(), DBError>;

    /// The `limit` most recently inserted readings, newest first
    async fn latest_readings(&self, pot_id: PotId, limit: usize) -> Result<Vec<Reading>, DBError>;

    async fn count_readings(&self, pot_id: PotId) -> Result<i64, DBError>;

    async fn check(&self) -> Result<(), DBError>;

    async fn close(&self);
}

pub async fn establish_db_connection(database_url: &str) -> Result<sqlx::PgPool, DBError> {
    Ok(sqlx::postgres::PgPoolOptions::new()
        .connect(database_url)
        .await?)
}

pub async fn migrate(conn: &sqlx::PgPool) -> Result<(), DBError> {
    sqlx::migrate!("./migrations").run(conn).await?;
    Ok(())
}

pub async fn check_schema(conn: &sqlx::PgPool) -> Result<(), DBError> {
    sql_stmnt!(CountRecord, "SELECT count(*) as count FROM users")
        .fetch_one(conn)
        .await?;
    Ok(())
}

/// Opens the document store selected by the config
pub async fn connect(config: &Config) -> Result<Arc<dyn DocumentStore>, DBError> {
    match config.store_backend() {
        StoreBackend::Postgres(database_url) => {
            let conn = establish_db_connection(database_url).await?;
            migrate(&conn).await?;
            info!("Connected to postgres document store");
            Ok(Arc::new(PgDocumentStore::new(conn)))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory document store, data is lost on shutdown");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CountRecord {
    pub count: Option<i64>,
}

impl CountRecord {
    pub fn count(self) -> i64 {
        self.count.unwrap_or(0)
    }
}
