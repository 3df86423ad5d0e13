use crate::domain::court::CourtPosition;
use crate::domain::errors::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const FORMATION_SIZE: usize = 6;

/// A player placed on one court position of a formation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSlot {
    pub position: CourtPosition,
    pub player_id: String,
    #[serde(default)]
    pub is_libero: bool,
    /// Position the libero substitutes for, when recorded
    #[serde(default)]
    pub libero_for: Option<CourtPosition>,
}

impl RosterSlot {
    pub fn new(position: CourtPosition, player_id: impl Into<String>) -> Self {
        Self {
            position,
            player_id: player_id.into(),
            is_libero: false,
            libero_for: None,
        }
    }

    pub fn libero(mut self) -> Self {
        self.is_libero = true;
        self
    }
}

/// A starting lineup: exactly one slot per court position, ordered by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub slots: Vec<RosterSlot>,
    pub created_at: DateTime<Utc>,
}

impl Formation {
    pub fn slot_at(&self, position: CourtPosition) -> Option<&RosterSlot> {
        self.slots.iter().find(|s| s.position == position)
    }

    pub fn uses_player(&self, player_id: &str) -> bool {
        self.slots.iter().any(|s| s.player_id == player_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub slots: Vec<RosterSlot>,
}

impl FormationDraft {
    pub fn new(name: impl Into<String>, slots: Vec<RosterSlot>) -> Self {
        Self {
            name: name.into(),
            description: None,
            slots,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            });
        }

        validate_slots(&self.slots)?;

        if let Some(slot) = self.slots.iter().find(|s| s.player_id.trim().is_empty()) {
            return Err(ValidationError::Required {
                field: format!("player_id (position {})", slot.position),
            });
        }

        Ok(())
    }

    /// Builds the stored formation with slots sorted by position
    pub fn into_formation(self, id: String, now: DateTime<Utc>) -> Formation {
        let mut slots = self.slots;
        slots.sort_by_key(|s| s.position);

        Formation {
            id,
            name: self.name.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            slots,
            created_at: now,
        }
    }
}

/// Six slots, each court position exactly once
pub fn validate_slots(slots: &[RosterSlot]) -> Result<(), ValidationError> {
    if slots.len() != FORMATION_SIZE {
        return Err(ValidationError::FormationSize { count: slots.len() });
    }

    let mut seen = HashSet::with_capacity(FORMATION_SIZE);
    for slot in slots {
        if !seen.insert(slot.position) {
            return Err(ValidationError::DuplicatePosition {
                position: slot.position.value(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(count: u8) -> Vec<RosterSlot> {
        (1..=count)
            .map(|p| RosterSlot::new(CourtPosition::new(p).unwrap(), format!("player-{p}")))
            .collect()
    }

    #[test]
    fn test_six_distinct_positions_accepted() {
        let draft = FormationDraft::new("Standard", slots(6));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_wrong_slot_count_rejected() {
        let draft = FormationDraft::new("Short", slots(5));
        assert_eq!(
            draft.validate(),
            Err(ValidationError::FormationSize { count: 5 })
        );
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let mut all = slots(6);
        all[5].position = CourtPosition::new(2).unwrap();
        let draft = FormationDraft::new("Broken", all);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::DuplicatePosition { position: 2 })
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let draft = FormationDraft::new(" ", slots(6));
        assert!(matches!(draft.validate(), Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_into_formation_sorts_slots() {
        let mut all = slots(6);
        all.reverse();
        let formation = FormationDraft::new("Reversed", all).into_formation("f1".into(), Utc::now());

        let order: Vec<u8> = formation.slots.iter().map(|s| s.position.value()).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6]);
        assert!(formation.uses_player("player-3"));
        assert_eq!(
            formation.slot_at(CourtPosition::new(4).unwrap()).map(|s| s.player_id.as_str()),
            Some("player-4")
        );
    }
}
