use crate::error::DBError;
use smartpot_core::PotId;

#[derive(sqlx::FromRow, Debug)]
pub struct PotImageDao {
    pub(crate) url: String,
}

impl PotImageDao {
    pub fn url(&self) -> &String {
        &self.url
    }
}

/// Stores the image url of a pot, replacing the previous one
pub async fn upsert(conn: &sqlx::PgPool, pot_id: PotId, url: &str) -> Result<(), DBError> {
    sql_stmnt!(
        r#"INSERT INTO pot_images (pot_id, url) VALUES ($1, $2)
            ON CONFLICT (pot_id) DO UPDATE SET url = EXCLUDED.url"#,
        pot_id,
        url
    )
    .execute(conn)
    .await?;
    Ok(())
}

// READ pot_images
pub async fn get(conn: &sqlx::PgPool, pot_id: PotId) -> Result<Option<PotImageDao>, DBError> {
    Ok(sql_stmnt!(
        PotImageDao,
        "SELECT url FROM pot_images WHERE pot_id = $1",
        pot_id
    )
    .fetch_optional(conn)
    .await?)
}
