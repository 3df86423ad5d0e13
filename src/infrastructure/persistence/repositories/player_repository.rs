use super::{column_timestamp, column_u8};
use crate::domain::player::{Player, PlayerQuery, PlayerSkills, PlayerSort};
use crate::domain::repositories::PlayerRepository;
use crate::domain::scoring::overall_skill;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn save(&self, player: &Player) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO players (
                id, name, number, role, handedness, height_cm, memo,
                spike, block, receive, serve, toss, connect, decision,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                number = excluded.number,
                role = excluded.role,
                handedness = excluded.handedness,
                height_cm = excluded.height_cm,
                memo = excluded.memo,
                spike = excluded.spike,
                block = excluded.block,
                receive = excluded.receive,
                serve = excluded.serve,
                toss = excluded.toss,
                connect = excluded.connect,
                decision = excluded.decision,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&player.id)
        .bind(&player.name)
        .bind(i64::from(player.number))
        .bind(player.role.code())
        .bind(player.handedness.to_string())
        .bind(player.height_cm.map(i64::from))
        .bind(&player.memo)
        .bind(i64::from(player.skills.spike))
        .bind(i64::from(player.skills.block))
        .bind(i64::from(player.skills.receive))
        .bind(i64::from(player.skills.serve))
        .bind(i64::from(player.skills.toss))
        .bind(i64::from(player.skills.connect))
        .bind(i64::from(player.skills.decision))
        .bind(player.created_at.timestamp_millis())
        .bind(player.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .context("Failed to save player")?;

        info!("Persisted Player {} (#{})", player.id, player.number);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Player>> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to load player")?;

        row.as_ref().map(map_row_to_player).transpose()
    }

    async fn find_all(&self, query: &PlayerQuery) -> Result<Vec<Player>> {
        let order_by = match query.sort {
            PlayerSort::Number => "number ASC, created_at DESC",
            PlayerSort::Spike => "spike DESC, created_at DESC",
            PlayerSort::Recent | PlayerSort::Overall => "created_at DESC",
        };

        let rows = match query.search_term() {
            Some(term) => {
                let sql = format!(
                    "SELECT * FROM players WHERE name LIKE ? ESCAPE '\\' OR number = ? ORDER BY {}",
                    order_by
                );
                sqlx::query(&sql)
                    .bind(format!("%{}%", escape_like(term)))
                    .bind(query.jersey_number().map(i64::from))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT * FROM players ORDER BY {}", order_by);
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        let mut players = rows
            .iter()
            .map(map_row_to_player)
            .collect::<Result<Vec<_>>>()?;

        if query.sort == PlayerSort::Overall {
            players.sort_by(|a, b| overall_skill(&b.skills).total_cmp(&overall_skill(&a.skills)));
        }

        Ok(players)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete player")?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escapes LIKE wildcards so search terms match literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn map_row_to_player(row: &SqliteRow) -> Result<Player> {
    let role: String = row.try_get("role")?;
    let handedness: String = row.try_get("handedness")?;
    let height: Option<i64> = row.try_get("height_cm")?;

    Ok(Player {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        number: column_u8(row, "number")?,
        role: role.parse()?,
        handedness: handedness.parse()?,
        height_cm: height
            .map(u16::try_from)
            .transpose()
            .context("Stored height out of range")?,
        memo: row.try_get("memo")?,
        skills: PlayerSkills {
            spike: column_u8(row, "spike")?,
            block: column_u8(row, "block")?,
            receive: column_u8(row, "receive")?,
            serve: column_u8(row, "serve")?,
            toss: column_u8(row, "toss")?,
            connect: column_u8(row, "connect")?,
            decision: column_u8(row, "decision")?,
        },
        created_at: column_timestamp(row, "created_at")?,
        updated_at: column_timestamp(row, "updated_at")?,
    })
}
