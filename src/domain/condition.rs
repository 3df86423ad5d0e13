//! Daily player condition logs.
//!
//! A record is keyed by (player, date). The scoring view only uses health,
//! fatigue and motivation; pain and notes are kept for the dashboard.

use crate::domain::errors::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CONDITION_MIN: u8 = 1;
pub const CONDITION_MAX: u8 = 5;
pub const DEFAULT_CONDITION: u8 = 3;
pub const PAIN_MAX: u8 = 5;

/// Day-specific physical and mental state used by scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCondition {
    pub health: u8,
    pub fatigue: u8,
    pub motivation: u8,
}

impl PlayerCondition {
    pub fn new(health: u8, fatigue: u8, motivation: u8) -> Self {
        Self {
            health,
            fatigue,
            motivation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub id: String,
    pub player_id: String,
    pub date: NaiveDate,
    pub health: u8,
    pub fatigue: u8,
    pub pain: u8,
    pub pain_area: Option<String>,
    pub motivation: u8,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConditionRecord {
    pub fn condition(&self) -> PlayerCondition {
        PlayerCondition::new(self.health, self.fatigue, self.motivation)
    }

    /// Poor health, heavy fatigue or notable pain
    pub fn needs_attention(&self) -> bool {
        self.health <= 2 || self.fatigue >= 4 || self.pain >= 3
    }
}

/// Upsert input for one player's day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDraft {
    pub player_id: String,
    pub date: NaiveDate,
    #[serde(default = "default_condition")]
    pub health: u8,
    #[serde(default = "default_condition")]
    pub fatigue: u8,
    #[serde(default)]
    pub pain: u8,
    #[serde(default)]
    pub pain_area: Option<String>,
    #[serde(default = "default_condition")]
    pub motivation: u8,
    #[serde(default)]
    pub memo: Option<String>,
}

fn default_condition() -> u8 {
    DEFAULT_CONDITION
}

impl ConditionDraft {
    pub fn new(player_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            player_id: player_id.into(),
            date,
            health: DEFAULT_CONDITION,
            fatigue: DEFAULT_CONDITION,
            pain: 0,
            pain_area: None,
            motivation: DEFAULT_CONDITION,
            memo: None,
        }
    }

    pub fn with_condition(mut self, condition: PlayerCondition) -> Self {
        self.health = condition.health;
        self.fatigue = condition.fatigue;
        self.motivation = condition.motivation;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.player_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "player_id".to_string(),
            });
        }

        let (min, max) = (i64::from(CONDITION_MIN), i64::from(CONDITION_MAX));
        ValidationError::check_range("health", i64::from(self.health), min, max)?;
        ValidationError::check_range("fatigue", i64::from(self.fatigue), min, max)?;
        ValidationError::check_range("motivation", i64::from(self.motivation), min, max)?;
        ValidationError::check_range("pain", i64::from(self.pain), 0, i64::from(PAIN_MAX))
    }

    /// Builds a stored record; an existing id is kept on upsert by storage
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> ConditionRecord {
        ConditionRecord {
            id,
            player_id: self.player_id,
            date: self.date,
            health: self.health,
            fatigue: self.fatigue,
            pain: self.pain,
            pain_area: self.pain_area.filter(|a| !a.trim().is_empty()),
            motivation: self.motivation,
            memo: self.memo.filter(|m| !m.trim().is_empty()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Conditions for a single date, by player id.
///
/// A player without a record maps to `None`, which scoring treats as neutral.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionLookup {
    by_player: HashMap<String, PlayerCondition>,
}

impl ConditionLookup {
    pub fn from_records(records: &[ConditionRecord]) -> Self {
        Self {
            by_player: records
                .iter()
                .map(|r| (r.player_id.clone(), r.condition()))
                .collect(),
        }
    }

    pub fn get(&self, player_id: &str) -> Option<PlayerCondition> {
        self.by_player.get(player_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }
}

/// Team-wide snapshot for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionSummary {
    pub date: NaiveDate,
    pub recorded: usize,
    pub avg_health: Option<f64>,
    pub avg_fatigue: Option<f64>,
    pub avg_motivation: Option<f64>,
    pub needs_attention: Vec<ConditionRecord>,
}

impl ConditionSummary {
    pub fn from_records(date: NaiveDate, records: &[ConditionRecord]) -> Self {
        let average = |pick: fn(&ConditionRecord) -> u8| -> Option<f64> {
            if records.is_empty() {
                return None;
            }
            let sum: u32 = records.iter().map(|r| u32::from(pick(r))).sum();
            Some(f64::from(sum) / records.len() as f64)
        };

        Self {
            date,
            recorded: records.len(),
            avg_health: average(|r| r.health),
            avg_fatigue: average(|r| r.fatigue),
            avg_motivation: average(|r| r.motivation),
            needs_attention: records
                .iter()
                .filter(|r| r.needs_attention())
                .cloned()
                .collect(),
        }
    }
}
