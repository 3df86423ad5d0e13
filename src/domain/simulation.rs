//! Rotation simulation over a resolved lineup.
//!
//! A `Lineup` binds each formation slot to its player's skills and the
//! condition for the chosen date. Snapshots re-place every slot with
//! `CourtPosition::rotated` and split rows with `is_front_row`.

use crate::domain::condition::{ConditionLookup, PlayerCondition};
use crate::domain::court::{CourtPosition, RotationState};
use crate::domain::errors::{RosterError, ValidationError};
use crate::domain::formation::{Formation, RosterSlot, validate_slots};
use crate::domain::player::{Player, PlayerSkills};
use crate::domain::scoring::{ScoringInput, TeamMetrics, condition_factor};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSlot {
    pub base_position: CourtPosition,
    pub player_id: String,
    pub player_name: String,
    pub player_number: u8,
    pub is_libero: bool,
    pub skills: PlayerSkills,
    pub condition: Option<PlayerCondition>,
}

impl LineupSlot {
    pub fn scoring_input(&self) -> ScoringInput {
        ScoringInput::new(self.skills, self.condition)
    }
}

/// A lineup slot at its position for one rotation state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub position: CourtPosition,
    pub front_row: bool,
    pub condition_factor: f64,
    pub slot: LineupSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationSnapshot {
    pub rotation: RotationState,
    /// Ordered by current court position
    pub placements: Vec<Placement>,
    pub metrics: TeamMetrics,
}

impl RotationSnapshot {
    pub fn front_row(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(|p| p.front_row)
    }

    pub fn back_row(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(|p| !p.front_row)
    }

    pub fn at(&self, position: CourtPosition) -> Option<&Placement> {
        self.placements.iter().find(|p| p.position == position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineup {
    slots: Vec<LineupSlot>,
}

impl Lineup {
    pub fn new(mut slots: Vec<LineupSlot>) -> Result<Self, ValidationError> {
        let roster: Vec<_> = slots
            .iter()
            .map(|s| RosterSlot::new(s.base_position, s.player_id.clone()))
            .collect();
        validate_slots(&roster)?;

        slots.sort_by_key(|s| s.base_position);
        Ok(Self { slots })
    }

    /// Resolves a stored formation against the roster and the day's conditions.
    ///
    /// Fails on the first slot whose player is missing from `players`.
    pub fn resolve(
        formation: &Formation,
        players: &HashMap<String, Player>,
        conditions: &ConditionLookup,
    ) -> Result<Self, RosterError> {
        let mut slots = Vec::with_capacity(formation.slots.len());
        for slot in &formation.slots {
            let player = players
                .get(&slot.player_id)
                .ok_or_else(|| RosterError::PlayerNotFound {
                    id: slot.player_id.clone(),
                })?;

            slots.push(LineupSlot {
                base_position: slot.position,
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                player_number: player.number,
                is_libero: slot.is_libero,
                skills: player.skills,
                condition: conditions.get(&player.id),
            });
        }

        // Stored formations were validated on creation
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[LineupSlot] {
        &self.slots
    }

    pub fn snapshot(&self, rotation: RotationState) -> RotationSnapshot {
        let mut placements: Vec<Placement> = self
            .slots
            .iter()
            .map(|slot| {
                let position = slot.base_position.rotated(rotation.index());
                Placement {
                    position,
                    front_row: position.is_front_row(),
                    condition_factor: condition_factor(slot.condition.as_ref()),
                    slot: slot.clone(),
                }
            })
            .collect();
        placements.sort_by_key(|p| p.position);

        let front: Vec<ScoringInput> = placements
            .iter()
            .filter(|p| p.front_row)
            .map(|p| p.slot.scoring_input())
            .collect();
        let back: Vec<ScoringInput> = placements
            .iter()
            .filter(|p| !p.front_row)
            .map(|p| p.slot.scoring_input())
            .collect();

        RotationSnapshot {
            rotation,
            metrics: TeamMetrics::compute(&front, &back),
            placements,
        }
    }

    pub fn full_cycle(&self) -> Vec<RotationSnapshot> {
        RotationState::cycle().map(|r| self.snapshot(r)).collect()
    }
}
