//! Roster application service.
//!
//! Validating facade over the three repositories. Domain drafts are checked
//! here before anything is written, cross-entity rules (a condition needs a
//! player, a formation needs six existing players, a player in a formation
//! cannot be deleted) are enforced here, and the simulation is assembled
//! from stored data.

use crate::domain::condition::{ConditionDraft, ConditionLookup, ConditionRecord, ConditionSummary};
use crate::domain::errors::RosterError;
use crate::domain::formation::{Formation, FormationDraft, RosterSlot};
use crate::domain::player::{Player, PlayerDraft, PlayerQuery};
use crate::domain::repositories::{ConditionRepository, FormationRepository, PlayerRepository};
use crate::domain::scoring::overall_skill;
use crate::domain::simulation::{Lineup, RotationSnapshot};
use crate::config::DEFAULT_RECENT_CONDITION_LIMIT;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A player together with their latest condition entries
#[derive(Debug, Clone, Serialize)]
pub struct PlayerDetail {
    pub player: Player,
    pub overall: f64,
    /// Newest first
    pub recent_conditions: Vec<ConditionRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormationMember {
    pub slot: RosterSlot,
    pub player: Option<Player>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormationDetail {
    pub formation: Formation,
    /// In court position order
    pub members: Vec<FormationMember>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub formation_id: String,
    pub formation_name: String,
    pub date: NaiveDate,
    /// How many of the six players had a condition entry for the date
    pub conditions_recorded: usize,
    pub rotations: Vec<RotationSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttentionEntry {
    pub player_name: String,
    pub player_number: Option<u8>,
    pub record: ConditionRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub roster_size: usize,
    pub summary: ConditionSummary,
    pub attention: Vec<AttentionEntry>,
}

pub struct RosterService {
    players: Arc<dyn PlayerRepository>,
    conditions: Arc<dyn ConditionRepository>,
    formations: Arc<dyn FormationRepository>,
    recent_condition_limit: usize,
}

impl RosterService {
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        conditions: Arc<dyn ConditionRepository>,
        formations: Arc<dyn FormationRepository>,
    ) -> Self {
        Self {
            players,
            conditions,
            formations,
            recent_condition_limit: DEFAULT_RECENT_CONDITION_LIMIT,
        }
    }

    pub fn with_recent_condition_limit(mut self, limit: usize) -> Self {
        self.recent_condition_limit = limit;
        self
    }

    // --- Players ---

    pub async fn list_players(&self, query: &PlayerQuery) -> Result<Vec<Player>> {
        self.players.find_all(query).await
    }

    pub async fn get_player(&self, id: &str) -> Result<PlayerDetail> {
        let player = self.require_player(id).await?;
        let recent_conditions = self
            .conditions
            .find_by_player(id, Some(self.recent_condition_limit))
            .await?;

        Ok(PlayerDetail {
            overall: overall_skill(&player.skills),
            player,
            recent_conditions,
        })
    }

    pub async fn create_player(&self, draft: PlayerDraft) -> Result<Player> {
        if let Err(e) = draft.validate() {
            return Err(reject("player", e.into()));
        }

        let player = draft.into_player(Uuid::new_v4().to_string(), Utc::now());
        self.players.save(&player).await?;

        info!(
            "Created player {} #{} ({}) as {}",
            player.name, player.number, player.role, player.id
        );
        Ok(player)
    }

    pub async fn update_player(&self, id: &str, draft: PlayerDraft) -> Result<Player> {
        let mut player = self.require_player(id).await?;
        if let Err(e) = draft.validate() {
            return Err(reject("player update", e.into()));
        }

        player.apply(draft, Utc::now());
        self.players.save(&player).await?;

        info!("Updated player {} ({})", player.name, player.id);
        Ok(player)
    }

    /// Deletes a player and their condition history.
    ///
    /// Players still placed in a formation are kept; the formation has to go first.
    pub async fn delete_player(&self, id: &str) -> Result<()> {
        let player = self.require_player(id).await?;

        let formations = self.formations.find_by_player(id).await?;
        if !formations.is_empty() {
            return Err(reject(
                "player deletion",
                RosterError::PlayerInFormation {
                    player_id: id.to_string(),
                    formations: formations.into_iter().map(|f| f.name).collect(),
                },
            ));
        }

        let removed_conditions = self.conditions.delete_by_player(id).await?;
        self.players.delete(id).await?;

        info!(
            "Deleted player {} ({}) with {} condition record(s)",
            player.name, id, removed_conditions
        );
        Ok(())
    }

    // --- Conditions ---

    pub async fn player_conditions(
        &self,
        player_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ConditionRecord>> {
        self.require_player(player_id).await?;
        self.conditions.find_by_player(player_id, limit).await
    }

    pub async fn conditions_on(&self, date: NaiveDate) -> Result<Vec<ConditionRecord>> {
        self.conditions.find_by_date(date).await
    }

    /// Records the condition for (player, date), replacing an earlier entry for the same day
    pub async fn upsert_condition(&self, draft: ConditionDraft) -> Result<ConditionRecord> {
        if let Err(e) = draft.validate() {
            return Err(reject("condition", e.into()));
        }
        self.require_player(&draft.player_id).await?;

        let record = draft.into_record(Uuid::new_v4().to_string(), Utc::now());
        let stored = self.conditions.upsert(&record).await?;

        info!(
            "Recorded condition for player {} on {}: health={} fatigue={} pain={} motivation={}",
            stored.player_id,
            stored.date,
            stored.health,
            stored.fatigue,
            stored.pain,
            stored.motivation
        );
        Ok(stored)
    }

    pub async fn delete_condition(&self, id: &str) -> Result<ConditionRecord> {
        match self.conditions.delete(id).await? {
            Some(record) => {
                info!(
                    "Deleted condition {} (player {}, {})",
                    id, record.player_id, record.date
                );
                Ok(record)
            }
            None => Err(RosterError::ConditionNotFound { id: id.to_string() }.into()),
        }
    }

    // --- Formations ---

    pub async fn list_formations(&self) -> Result<Vec<Formation>> {
        self.formations.find_all().await
    }

    pub async fn get_formation(&self, id: &str) -> Result<FormationDetail> {
        let formation = self.require_formation(id).await?;

        let mut members = Vec::with_capacity(formation.slots.len());
        for slot in &formation.slots {
            members.push(FormationMember {
                player: self.players.find_by_id(&slot.player_id).await?,
                slot: slot.clone(),
            });
        }

        Ok(FormationDetail { formation, members })
    }

    pub async fn create_formation(&self, draft: FormationDraft) -> Result<Formation> {
        if let Err(e) = draft.validate() {
            return Err(reject("formation", e.into()));
        }

        for slot in &draft.slots {
            if self.players.find_by_id(&slot.player_id).await?.is_none() {
                return Err(reject(
                    "formation",
                    RosterError::PlayerNotFound {
                        id: slot.player_id.clone(),
                    },
                ));
            }
        }

        let formation = draft.into_formation(Uuid::new_v4().to_string(), Utc::now());
        self.formations.create(&formation).await?;

        info!("Created formation {} ({})", formation.name, formation.id);
        Ok(formation)
    }

    pub async fn delete_formation(&self, id: &str) -> Result<()> {
        if !self.formations.delete(id).await? {
            return Err(RosterError::FormationNotFound { id: id.to_string() }.into());
        }
        info!("Deleted formation {}", id);
        Ok(())
    }

    // --- Simulation ---

    /// Resolves a formation into a lineup carrying each player's condition on `date`
    pub async fn build_lineup(&self, formation_id: &str, date: NaiveDate) -> Result<Lineup> {
        let formation = self.require_formation(formation_id).await?;
        let (lineup, _) = self.resolve_lineup(&formation, date).await?;
        Ok(lineup)
    }

    pub async fn simulate(&self, formation_id: &str, date: NaiveDate) -> Result<SimulationReport> {
        let formation = self.require_formation(formation_id).await?;
        let (lineup, conditions_recorded) = self.resolve_lineup(&formation, date).await?;

        debug!(
            "Simulating formation {} on {} ({}/6 conditions recorded)",
            formation.name, date, conditions_recorded
        );

        Ok(SimulationReport {
            formation_id: formation.id,
            formation_name: formation.name,
            date,
            conditions_recorded,
            rotations: lineup.full_cycle(),
        })
    }

    async fn resolve_lineup(
        &self,
        formation: &Formation,
        date: NaiveDate,
    ) -> Result<(Lineup, usize)> {
        let mut players = HashMap::with_capacity(formation.slots.len());
        for slot in &formation.slots {
            if let Some(player) = self.players.find_by_id(&slot.player_id).await? {
                players.insert(player.id.clone(), player);
            }
        }

        let conditions = ConditionLookup::from_records(&self.conditions.find_by_date(date).await?);
        let recorded = players
            .keys()
            .filter(|id| conditions.get(id).is_some())
            .count();

        let lineup = Lineup::resolve(formation, &players, &conditions)?;
        Ok((lineup, recorded))
    }

    // --- Dashboard ---

    pub async fn dashboard(&self, date: NaiveDate) -> Result<Dashboard> {
        let roster = self.players.find_all(&PlayerQuery::default()).await?;
        let records = self.conditions.find_by_date(date).await?;
        let summary = ConditionSummary::from_records(date, &records);

        let by_id: HashMap<&str, &Player> = roster.iter().map(|p| (p.id.as_str(), p)).collect();
        let attention = summary
            .needs_attention
            .iter()
            .map(|record| {
                let player = by_id.get(record.player_id.as_str());
                AttentionEntry {
                    player_name: player
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| record.player_id.clone()),
                    player_number: player.map(|p| p.number),
                    record: record.clone(),
                }
            })
            .collect();

        Ok(Dashboard {
            roster_size: roster.len(),
            summary,
            attention,
        })
    }

    async fn require_player(&self, id: &str) -> Result<Player> {
        self.players
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::PlayerNotFound { id: id.to_string() }.into())
    }

    async fn require_formation(&self, id: &str) -> Result<Formation> {
        self.formations
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::FormationNotFound { id: id.to_string() }.into())
    }
}

fn reject(operation: &str, err: RosterError) -> anyhow::Error {
    warn!("Rejected {}: {}", operation, err);
    err.into()
}
