use super::{image, reading, user, DocumentStore, PotClaim};
use crate::error::DBError;
use async_trait::async_trait;
use smartpot_core::{ChatId, PotId, Reading};
use sqlx::PgPool;

pub struct PgDocumentStore {
    conn: PgPool,
}

impl PgDocumentStore {
    pub fn new(conn: PgPool) -> Self {
        PgDocumentStore { conn }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn add_pot(&self, chat_id: ChatId, pot_id: PotId) -> Result<PotClaim, DBError> {
        user::insert_pot(&self.conn, chat_id, pot_id).await
    }

    async fn owner_of(&self, pot_id: PotId) -> Result<Option<ChatId>, DBError> {
        user::owner(&self.conn, pot_id).await
    }

    async fn pots_of(&self, chat_id: ChatId) -> Result<Option<Vec<PotId>>, DBError> {
        user::pots(&self.conn, chat_id).await
    }

    async fn upsert_image(&self, pot_id: PotId, url: &str) -> Result<(), DBError> {
        image::upsert(&self.conn, pot_id, url).await
    }

    async fn image_url(&self, pot_id: PotId) -> Result<Option<String>, DBError> {
        Ok(image::get(&self.conn, pot_id)
            .await?
            .map(|dao| dao.url().clone()))
    }

    async fn insert_reading(&self, reading: &Reading) -> Result<(), DBError> {
        reading::insert(&self.conn, reading).await
    }

    async fn latest_readings(&self, pot_id: PotId, limit: usize) -> Result<Vec<Reading>, DBError> {
        let mut daos = reading::get_latest(&self.conn, pot_id, limit).await?;
        Ok(daos.drain(..).map(Reading::from).collect())
    }

    async fn count_readings(&self, pot_id: PotId) -> Result<i64, DBError> {
        reading::count(&self.conn, pot_id).await
    }

    async fn check(&self) -> Result<(), DBError> {
        super::check_schema(&self.conn).await
    }

    async fn close(&self) {
        self.conn.close().await
    }
}
