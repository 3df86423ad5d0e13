use anyhow::{Context, Result};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Shared connection pool with the roster schema applied
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_max_connections(db_url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn with_max_connections(db_url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = db_url.contains(":memory:") || db_url.contains("mode=memory");

        // Ensure the directory exists if it's a file path
        if !in_memory && let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let mut options = SqliteConnectOptions::from_str(db_url)
            .context(format!("Invalid database URL: {}", db_url))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Each connection to an in-memory database sees its own empty database,
        // so those pools are pinned to a single long-lived connection.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Fresh in-memory database, used by tests and `--in-memory` runs
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Players
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                number INTEGER NOT NULL,
                role TEXT NOT NULL,
                handedness TEXT NOT NULL DEFAULT 'right',
                height_cm INTEGER,
                memo TEXT,
                spike INTEGER NOT NULL DEFAULT 50,
                block INTEGER NOT NULL DEFAULT 50,
                receive INTEGER NOT NULL DEFAULT 50,
                serve INTEGER NOT NULL DEFAULT 50,
                toss INTEGER NOT NULL DEFAULT 50,
                connect INTEGER NOT NULL DEFAULT 50,
                decision INTEGER NOT NULL DEFAULT 50,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create players table")?;

        // 2. Daily conditions, one per player per date
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conditions (
                id TEXT PRIMARY KEY,
                player_id TEXT NOT NULL REFERENCES players(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                health INTEGER NOT NULL DEFAULT 3,
                fatigue INTEGER NOT NULL DEFAULT 3,
                pain INTEGER NOT NULL DEFAULT 0,
                pain_area TEXT,
                motivation INTEGER NOT NULL DEFAULT 3,
                memo TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE (player_id, date)
            );
            CREATE INDEX IF NOT EXISTS idx_conditions_date
            ON conditions (date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create conditions table")?;

        // 3. Formations and their six positions
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS formations (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                created_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS formation_positions (
                formation_id TEXT NOT NULL REFERENCES formations(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                player_id TEXT NOT NULL REFERENCES players(id) ON DELETE RESTRICT,
                is_libero BOOLEAN NOT NULL DEFAULT 0,
                libero_for INTEGER,
                PRIMARY KEY (formation_id, position)
            );
            CREATE INDEX IF NOT EXISTS idx_formation_positions_player
            ON formation_positions (player_id);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create formation tables")?;

        info!("Database schema initialized.");
        Ok(())
    }
}
