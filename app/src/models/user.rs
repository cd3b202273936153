use super::PotClaim;
use crate::error::DBError;
use smartpot_core::{ChatId, PotId};

#[derive(sqlx::FromRow, Debug)]
pub struct UserPotDao {
    pub(crate) pot_id: i64,
    pub(crate) chat_id: i64,
}

impl UserPotDao {
    pub fn pot_id(&self) -> PotId {
        self.pot_id
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

#[derive(sqlx::FromRow)]
struct ChatIdRecord {
    chat_id: i64,
}

/// Adds a pot to the pot set of an account
///
/// Runs in one transaction: the account row is only kept together with its pot.
pub async fn insert_pot(
    conn: &sqlx::PgPool,
    chat_id: ChatId,
    pot_id: PotId,
) -> Result<PotClaim, DBError> {
    let mut tx = conn.begin().await?;

    let created = sql_stmnt!(
        "INSERT INTO users (chat_id) VALUES ($1) ON CONFLICT (chat_id) DO NOTHING",
        chat_id
    )
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    let inserted = sql_stmnt!(
        "INSERT INTO user_pots (pot_id, chat_id) VALUES ($1, $2) ON CONFLICT (pot_id) DO NOTHING",
        pot_id,
        chat_id
    )
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    if inserted {
        tx.commit().await?;
        return Ok(if created {
            PotClaim::Created
        } else {
            PotClaim::Added
        });
    }

    let owner = sql_stmnt!(
        UserPotDao,
        "SELECT pot_id, chat_id FROM user_pots WHERE pot_id = $1",
        pot_id
    )
    .fetch_one(&mut *tx)
    .await?;

    if owner.chat_id() == chat_id {
        tx.commit().await?;
        Ok(PotClaim::AlreadyAssociated)
    } else {
        tx.rollback().await?;
        Ok(PotClaim::ClaimedBy(owner.chat_id()))
    }
}

pub async fn owner(conn: &sqlx::PgPool, pot_id: PotId) -> Result<Option<ChatId>, DBError> {
    Ok(sql_stmnt!(
        UserPotDao,
        "SELECT pot_id, chat_id FROM user_pots WHERE pot_id = $1",
        pot_id
    )
    .fetch_optional(conn)
    .await?
    .map(|dao| dao.chat_id()))
}

pub async fn exists(conn: &sqlx::PgPool, chat_id: ChatId) -> Result<bool, DBError> {
    Ok(sql_stmnt!(
        ChatIdRecord,
        "SELECT chat_id FROM users WHERE chat_id = $1",
        chat_id
    )
    .fetch_optional(conn)
    .await?
    .map(|record| record.chat_id == chat_id)
    .unwrap_or(false))
}

// READ user_pots
pub async fn pots(conn: &sqlx::PgPool, chat_id: ChatId) -> Result<Option<Vec<PotId>>, DBError> {
    if !exists(conn, chat_id).await? {
        return Ok(None);
    }

    let daos = sql_stmnt!(
        UserPotDao,
        "SELECT pot_id, chat_id FROM user_pots WHERE chat_id = $1 ORDER BY pot_id ASC",
        chat_id
    )
    .fetch_all(conn)
    .await?;
    Ok(Some(daos.iter().map(UserPotDao::pot_id).collect()))
}
