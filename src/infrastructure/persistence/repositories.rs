mod condition_repository;
mod formation_repository;
mod player_repository;

pub use condition_repository::SqliteConditionRepository;
pub use formation_repository::SqliteFormationRepository;
pub use player_repository::SqlitePlayerRepository;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Small integer column (ratings, jersey numbers, positions)
fn column_u8(row: &SqliteRow, column: &str) -> Result<u8> {
    let value: i64 = row.try_get(column)?;
    u8::try_from(value).context(format!("Column {} out of range: {}", column, value))
}

fn column_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let millis: i64 = row.try_get(column)?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .context(format!("Invalid timestamp in {}: {}", column, millis))
}
