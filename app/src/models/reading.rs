use super::CountRecord;
use crate::error::DBError;
use smartpot_core::{PotId, Reading, ReadingTimestamp};

#[derive(sqlx::FromRow)]
pub struct ReadingDao {
    // pub(crate) id: i64,
    pub(crate) pot_id: i64,
    pub(crate) year: i32,
    pub(crate) month: i32,
    pub(crate) day: i32,
    pub(crate) hour: i32,
    pub(crate) minute: i32,
    pub(crate) ph: f64,
    pub(crate) soil: f64,
}

impl From<ReadingDao> for Reading {
    fn from(val: ReadingDao) -> Self {
        Reading {
            pot_id: val.pot_id,
            timestamp: ReadingTimestamp {
                year: val.year,
                month: val.month as u32,
                day: val.day as u32,
                hour: val.hour as u32,
                minute: val.minute as u32,
            },
            ph: val.ph,
            soil: val.soil,
        }
    }
}

pub async fn insert(conn: &sqlx::PgPool, reading: &Reading) -> Result<(), DBError> {
    let ts = &reading.timestamp;
    sql_stmnt!(
        r#"INSERT INTO readings
            (pot_id, year, month, day, hour, minute, ph, soil)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        reading.pot_id,
        ts.year,
        ts.month as i32,
        ts.day as i32,
        ts.hour as i32,
        ts.minute as i32,
        reading.ph,
        reading.soil
    )
    .execute(conn)
    .await?;
    Ok(())
}

/// READ readings, newest insertion first
pub async fn get_latest(
    conn: &sqlx::PgPool,
    pot_id: PotId,
    limit: usize,
) -> Result<Vec<ReadingDao>, DBError> {
    Ok(sql_stmnt!(
        ReadingDao,
        r#"SELECT pot_id, year, month, day, hour, minute, ph, soil
            FROM readings
            WHERE pot_id = $1
            ORDER BY id DESC
            LIMIT $2"#,
        pot_id,
        limit as i64
    )
    .fetch_all(conn)
    .await?)
}

pub async fn count(conn: &sqlx::PgPool, pot_id: PotId) -> Result<i64, DBError> {
    let record = sql_stmnt!(
        CountRecord,
        "SELECT count(*) as count FROM readings WHERE pot_id = $1",
        pot_id
    )
    .fetch_one(conn)
    .await?;
    Ok(record.count())
}
