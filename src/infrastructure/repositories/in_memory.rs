//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementations of the repository traits defined
//! in `domain::repositories`, with the same ordering and upsert semantics
//! as the SQLite versions.
//!
//! # Limitations
//!
//! - Data is lost when the process exits
//! - No referential integrity between the three stores; the application
//!   service performs the existence checks

use crate::domain::condition::ConditionRecord;
use crate::domain::formation::Formation;
use crate::domain::player::{Player, PlayerQuery, PlayerSort};
use crate::domain::repositories::{ConditionRepository, FormationRepository, PlayerRepository};
use crate::domain::scoring::overall_skill;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of PlayerRepository
pub struct InMemoryPlayerRepository {
    players: Arc<RwLock<HashMap<String, Player>>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn save(&self, player: &Player) -> Result<()> {
        let mut players = self.players.write().await;
        let mut stored = player.clone();
        if let Some(existing) = players.get(&player.id) {
            stored.created_at = existing.created_at;
        }
        players.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Player>> {
        Ok(self.players.read().await.get(id).cloned())
    }

    async fn find_all(&self, query: &PlayerQuery) -> Result<Vec<Player>> {
        let mut players: Vec<Player> = self
            .players
            .read()
            .await
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        // Newest first as the base order, then the requested key
        players.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        match query.sort {
            PlayerSort::Recent => {}
            PlayerSort::Number => players.sort_by_key(|p| p.number),
            PlayerSort::Spike => players.sort_by(|a, b| b.skills.spike.cmp(&a.skills.spike)),
            PlayerSort::Overall => players
                .sort_by(|a, b| overall_skill(&b.skills).total_cmp(&overall_skill(&a.skills))),
        }

        Ok(players)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.players.write().await.remove(id).is_some())
    }
}

/// In-memory implementation of ConditionRepository
pub struct InMemoryConditionRepository {
    records: Arc<RwLock<Vec<ConditionRecord>>>,
}

impl InMemoryConditionRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryConditionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConditionRepository for InMemoryConditionRepository {
    async fn upsert(&self, record: &ConditionRecord) -> Result<ConditionRecord> {
        let mut records = self.records.write().await;

        let existing = records
            .iter_mut()
            .find(|r| r.player_id == record.player_id && r.date == record.date);

        let stored = match existing {
            Some(current) => {
                current.health = record.health;
                current.fatigue = record.fatigue;
                current.pain = record.pain;
                current.pain_area = record.pain_area.clone();
                current.motivation = record.motivation;
                current.memo = record.memo.clone();
                current.updated_at = record.updated_at;
                current.clone()
            }
            None => {
                records.push(record.clone());
                record.clone()
            }
        };

        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ConditionRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_player(
        &self,
        player_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ConditionRecord>> {
        let mut found: Vec<ConditionRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.player_id == player_id)
            .cloned()
            .collect();

        found.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<ConditionRecord>> {
        let mut found: Vec<ConditionRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .collect();

        found.sort_by_key(|r| r.created_at);
        Ok(found)
    }

    async fn delete(&self, id: &str) -> Result<Option<ConditionRecord>> {
        let mut records = self.records.write().await;
        Ok(records
            .iter()
            .position(|r| r.id == id)
            .map(|index| records.remove(index)))
    }

    async fn delete_by_player(&self, player_id: &str) -> Result<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.player_id != player_id);
        Ok((before - records.len()) as u64)
    }
}

/// In-memory implementation of FormationRepository
pub struct InMemoryFormationRepository {
    formations: Arc<RwLock<Vec<Formation>>>,
}

impl InMemoryFormationRepository {
    pub fn new() -> Self {
        Self {
            formations: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryFormationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormationRepository for InMemoryFormationRepository {
    async fn create(&self, formation: &Formation) -> Result<()> {
        let mut formations = self.formations.write().await;
        if formations.iter().any(|f| f.id == formation.id) {
            anyhow::bail!("Formation {} already exists", formation.id);
        }
        formations.push(formation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Formation>> {
        Ok(self
            .formations
            .read()
            .await
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Formation>> {
        let mut all = self.formations.read().await.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_by_player(&self, player_id: &str) -> Result<Vec<Formation>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|f| f.uses_player(player_id))
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut formations = self.formations.write().await;
        let before = formations.len();
        formations.retain(|f| f.id != id);
        Ok(formations.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition::{ConditionDraft, PlayerCondition};
    use crate::domain::player::{PlayerDraft, PlayerRole, PlayerSkills};
    use chrono::{Duration, Utc};

    fn player(id: &str, number: u8, spike: u8, minutes_ago: i64) -> Player {
        let mut skills = PlayerSkills::default();
        skills.spike = spike;
        PlayerDraft::new(format!("Player {number}"), number, PlayerRole::OutsideHitter)
            .with_skills(skills)
            .into_player(id.to_string(), Utc::now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_player_sorting() {
        let repo = InMemoryPlayerRepository::new();
        repo.save(&player("a", 7, 60, 3)).await.unwrap();
        repo.save(&player("b", 2, 90, 2)).await.unwrap();
        repo.save(&player("c", 5, 70, 1)).await.unwrap();

        let ids = |players: Vec<Player>| players.into_iter().map(|p| p.id).collect::<Vec<_>>();

        let recent = repo.find_all(&PlayerQuery::default()).await.unwrap();
        assert_eq!(ids(recent), vec!["c", "b", "a"]);

        let by_number = repo
            .find_all(&PlayerQuery::default().sorted_by(PlayerSort::Number))
            .await
            .unwrap();
        assert_eq!(ids(by_number), vec!["b", "c", "a"]);

        let by_spike = repo
            .find_all(&PlayerQuery::default().sorted_by(PlayerSort::Spike))
            .await
            .unwrap();
        assert_eq!(ids(by_spike), vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_player_save_keeps_created_at() {
        let repo = InMemoryPlayerRepository::new();
        let original = player("a", 7, 60, 10);
        repo.save(&original).await.unwrap();

        let mut edited = original.clone();
        edited.name = "Renamed".to_string();
        edited.created_at = Utc::now();
        repo.save(&edited).await.unwrap();

        let stored = repo.find_by_id("a").await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_condition_upsert_keeps_id() {
        let repo = InMemoryConditionRepository::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();

        let first = ConditionDraft::new("p1", date).into_record("c1".into(), Utc::now());
        repo.upsert(&first).await.unwrap();

        let second = ConditionDraft::new("p1", date)
            .with_condition(PlayerCondition::new(5, 1, 5))
            .into_record("c2".into(), Utc::now());
        let stored = repo.upsert(&second).await.unwrap();

        assert_eq!(stored.id, "c1");
        assert_eq!(stored.health, 5);
        assert_eq!(repo.find_by_date(date).await.unwrap().len(), 1);
        assert!(repo.find_by_id("c2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_condition_history_newest_first_with_limit() {
        let repo = InMemoryConditionRepository::new();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        for day in 0..5u64 {
            let date = start + chrono::Days::new(day);
            let record = ConditionDraft::new("p1", date).into_record(format!("c{day}"), Utc::now());
            repo.upsert(&record).await.unwrap();
        }

        let recent = repo.find_by_player("p1", Some(3)).await.unwrap();
        let dates: Vec<u32> = recent.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(dates, vec![5, 4, 3]);

        assert_eq!(repo.delete_by_player("p1").await.unwrap(), 5);
        assert!(repo.find_by_player("p1", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_formation_delete_reports_missing() {
        let repo = InMemoryFormationRepository::new();
        assert!(!repo.delete("nope").await.unwrap());
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
