//! Repository Pattern Abstractions
//!
//! Storage seams for the roster. Business rules (bounds, the six-slot
//! formation rule, existence checks) live in the domain and application
//! layers; repositories only persist and query.
//!
//! # Implementations
//!
//! - `infrastructure::persistence`: SQLite via `sqlx`
//! - `infrastructure::repositories`: in-memory, for tests
//!
//! # Example
//!
//! ```rust
//! use volleyroster::domain::player::PlayerQuery;
//! use volleyroster::domain::repositories::PlayerRepository;
//! use volleyroster::infrastructure::InMemoryPlayerRepository;
//!
//! # tokio_test::block_on(async {
//! let repo = InMemoryPlayerRepository::new();
//! let players = repo.find_all(&PlayerQuery::default()).await?;
//! assert!(players.is_empty());
//! # Ok::<(), anyhow::Error>(())
//! # }).unwrap();
//! ```

use crate::domain::condition::ConditionRecord;
use crate::domain::formation::Formation;
use crate::domain::player::{Player, PlayerQuery};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Insert, or replace the record with the same id
    async fn save(&self, player: &Player) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Player>>;

    /// Players matching the query's search, in the query's order
    async fn find_all(&self, query: &PlayerQuery) -> Result<Vec<Player>>;

    /// Returns false when no such player existed
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ConditionRepository: Send + Sync {
    /// Insert or overwrite the record for (player_id, date).
    ///
    /// An existing record keeps its id and creation time; the stored
    /// record is returned.
    async fn upsert(&self, record: &ConditionRecord) -> Result<ConditionRecord>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ConditionRecord>>;

    /// Newest date first, optionally truncated
    async fn find_by_player(
        &self,
        player_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ConditionRecord>>;

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<ConditionRecord>>;

    /// Returns the removed record, if any
    async fn delete(&self, id: &str) -> Result<Option<ConditionRecord>>;

    /// Removes every record for a player, returning how many were removed
    async fn delete_by_player(&self, player_id: &str) -> Result<u64>;
}

#[async_trait]
pub trait FormationRepository: Send + Sync {
    /// Stores the formation and its slots as one unit
    async fn create(&self, formation: &Formation) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Formation>>;

    /// Newest first
    async fn find_all(&self) -> Result<Vec<Formation>>;

    /// Formations with a slot for the given player
    async fn find_by_player(&self, player_id: &str) -> Result<Vec<Formation>>;

    /// Returns false when no such formation existed
    async fn delete(&self, id: &str) -> Result<bool>;
}
