use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::application::roster_service::RosterService;
use crate::config::Config;
use crate::domain::repositories::{ConditionRepository, FormationRepository, PlayerRepository};
use crate::infrastructure::persistence::database::Database;
use crate::infrastructure::persistence::repositories::{
    SqliteConditionRepository, SqliteFormationRepository, SqlitePlayerRepository,
};

pub struct PersistenceHandle {
    pub db: Database,
    pub player_repository: Arc<dyn PlayerRepository>,
    pub condition_repository: Arc<dyn ConditionRepository>,
    pub formation_repository: Arc<dyn FormationRepository>,
}

impl PersistenceHandle {
    fn from_database(db: Database) -> Self {
        Self {
            player_repository: Arc::new(SqlitePlayerRepository::new(db.pool.clone())),
            condition_repository: Arc::new(SqliteConditionRepository::new(db.pool.clone())),
            formation_repository: Arc::new(SqliteFormationRepository::new(db.pool.clone())),
            db,
        }
    }

    pub fn roster_service(&self) -> RosterService {
        RosterService::new(
            self.player_repository.clone(),
            self.condition_repository.clone(),
            self.formation_repository.clone(),
        )
    }
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(config: &Config) -> Result<PersistenceHandle> {
        info!("Initializing Database at {}", config.database_url);

        let db = Database::with_max_connections(
            &config.database_url,
            config.database_max_connections,
        )
        .await
        .context("Failed to initialize database")?;

        Ok(PersistenceHandle::from_database(db))
    }

    /// Throwaway storage: nothing survives the process
    pub async fn in_memory() -> Result<PersistenceHandle> {
        info!("Initializing in-memory database");

        let db = Database::in_memory()
            .await
            .context("Failed to initialize in-memory database")?;

        Ok(PersistenceHandle::from_database(db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::{PlayerDraft, PlayerQuery, PlayerRole};

    #[tokio::test]
    async fn test_in_memory_handle_serves_roster() {
        let handle = PersistenceBootstrap::in_memory().await.unwrap();
        let service = handle.roster_service();

        service
            .create_player(PlayerDraft::new("Ren", 3, PlayerRole::Setter))
            .await
            .unwrap();

        let players = handle
            .player_repository
            .find_all(&PlayerQuery::default())
            .await
            .unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Ren");
    }
}
