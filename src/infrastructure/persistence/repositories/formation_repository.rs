use super::{column_timestamp, column_u8};
use crate::domain::court::CourtPosition;
use crate::domain::formation::{Formation, RosterSlot};
use crate::domain::repositories::FormationRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

pub struct SqliteFormationRepository {
    pool: SqlitePool,
}

impl SqliteFormationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_slots(&self, formation_id: &str) -> Result<Vec<RosterSlot>> {
        let rows = sqlx::query(
            "SELECT * FROM formation_positions WHERE formation_id = ? ORDER BY position ASC",
        )
        .bind(formation_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_slot).collect()
    }

    async fn hydrate(&self, rows: Vec<SqliteRow>) -> Result<Vec<Formation>> {
        let mut formations = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("id")?;
            let slots = self.load_slots(&id).await?;
            formations.push(Formation {
                id,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                slots,
                created_at: column_timestamp(row, "created_at")?,
            });
        }
        Ok(formations)
    }
}

#[async_trait]
impl FormationRepository for SqliteFormationRepository {
    async fn create(&self, formation: &Formation) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO formations (id, name, description, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&formation.id)
        .bind(&formation.name)
        .bind(&formation.description)
        .bind(formation.created_at.timestamp_millis())
        .execute(&mut *tx)
        .await
        .context("Failed to save formation")?;

        for slot in &formation.slots {
            sqlx::query(
                r#"
                INSERT INTO formation_positions (formation_id, position, player_id, is_libero, libero_for)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&formation.id)
            .bind(i64::from(slot.position.value()))
            .bind(&slot.player_id)
            .bind(slot.is_libero)
            .bind(slot.libero_for.map(|p| i64::from(p.value())))
            .execute(&mut *tx)
            .await
            .context(format!(
                "Failed to save formation position {}",
                slot.position
            ))?;
        }

        tx.commit().await.context("Failed to commit formation")?;

        info!("Persisted Formation {} ({})", formation.name, formation.id);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Formation>> {
        let row = sqlx::query("SELECT * FROM formations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Formation>> {
        let rows = sqlx::query("SELECT * FROM formations ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        self.hydrate(rows).await
    }

    async fn find_by_player(&self, player_id: &str) -> Result<Vec<Formation>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT f.* FROM formations f
            JOIN formation_positions fp ON fp.formation_id = f.id
            WHERE fp.player_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;
        self.hydrate(rows).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        // Positions go with the formation (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM formations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete formation")?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_row_to_slot(row: &SqliteRow) -> Result<RosterSlot> {
    let libero_for: Option<i64> = row.try_get("libero_for")?;
    let libero_for = libero_for
        .map(|value| {
            u8::try_from(value)
                .ok()
                .and_then(|v| CourtPosition::new(v).ok())
                .context(format!("Invalid libero_for position: {}", value))
        })
        .transpose()?;

    Ok(RosterSlot {
        position: CourtPosition::new(column_u8(row, "position")?)?,
        player_id: row.try_get("player_id")?,
        is_libero: row.try_get("is_libero")?,
        libero_for,
    })
}
