use super::{column_timestamp, column_u8};
use crate::domain::condition::ConditionRecord;
use crate::domain::repositories::ConditionRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

pub struct SqliteConditionRepository {
    pool: SqlitePool,
}

impl SqliteConditionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConditionRepository for SqliteConditionRepository {
    async fn upsert(&self, record: &ConditionRecord) -> Result<ConditionRecord> {
        sqlx::query(
            r#"
            INSERT INTO conditions (
                id, player_id, date, health, fatigue, pain, pain_area,
                motivation, memo, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(player_id, date) DO UPDATE SET
                health = excluded.health,
                fatigue = excluded.fatigue,
                pain = excluded.pain,
                pain_area = excluded.pain_area,
                motivation = excluded.motivation,
                memo = excluded.memo,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.id)
        .bind(&record.player_id)
        .bind(record.date)
        .bind(i64::from(record.health))
        .bind(i64::from(record.fatigue))
        .bind(i64::from(record.pain))
        .bind(&record.pain_area)
        .bind(i64::from(record.motivation))
        .bind(&record.memo)
        .bind(record.created_at.timestamp_millis())
        .bind(record.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .context("Failed to save condition")?;

        let row = sqlx::query("SELECT * FROM conditions WHERE player_id = ? AND date = ?")
            .bind(&record.player_id)
            .bind(record.date)
            .fetch_one(&self.pool)
            .await
            .context("Failed to reload condition")?;
        let stored = map_row_to_condition(&row)?;

        info!(
            "Persisted Condition for player {} on {}",
            stored.player_id, stored.date
        );
        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ConditionRecord>> {
        let row = sqlx::query("SELECT * FROM conditions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_condition).transpose()
    }

    async fn find_by_player(
        &self,
        player_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ConditionRecord>> {
        // LIMIT -1 means no limit in SQLite
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let rows =
            sqlx::query("SELECT * FROM conditions WHERE player_id = ? ORDER BY date DESC LIMIT ?")
                .bind(player_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(map_row_to_condition).collect()
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<ConditionRecord>> {
        let rows = sqlx::query("SELECT * FROM conditions WHERE date = ? ORDER BY created_at ASC")
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_condition).collect()
    }

    async fn delete(&self, id: &str) -> Result<Option<ConditionRecord>> {
        let existing = self.find_by_id(id).await?;
        if existing.is_some() {
            sqlx::query("DELETE FROM conditions WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to delete condition")?;
        }
        Ok(existing)
    }

    async fn delete_by_player(&self, player_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM conditions WHERE player_id = ?")
            .bind(player_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete player conditions")?;

        Ok(result.rows_affected())
    }
}

fn map_row_to_condition(row: &SqliteRow) -> Result<ConditionRecord> {
    Ok(ConditionRecord {
        id: row.try_get("id")?,
        player_id: row.try_get("player_id")?,
        date: row.try_get("date")?,
        health: column_u8(row, "health")?,
        fatigue: column_u8(row, "fatigue")?,
        pain: column_u8(row, "pain")?,
        pain_area: row.try_get("pain_area")?,
        motivation: column_u8(row, "motivation")?,
        memo: row.try_get("memo")?,
        created_at: column_timestamp(row, "created_at")?,
        updated_at: column_timestamp(row, "updated_at")?,
    })
}
