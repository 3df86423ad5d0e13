//! Court positions and the six-step rotation cycle.
//!
//! Positions follow the standard numbering: 1 is back right (the server),
//! then counter-clockwise through 2 (front right), 3 (front center),
//! 4 (front left), 5 (back left) and 6 (back center).

use crate::domain::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rotation states before the lineup returns to its start
pub const ROTATION_CYCLE: u8 = 6;

/// One of the six rotation slots on court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CourtPosition(u8);

impl CourtPosition {
    pub const ALL: [CourtPosition; 6] = [
        CourtPosition(1),
        CourtPosition(2),
        CourtPosition(3),
        CourtPosition(4),
        CourtPosition(5),
        CourtPosition(6),
    ];

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (1..=ROTATION_CYCLE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidCourtPosition {
                value: i64::from(value),
            })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Advances one rotation: 1→6, 2→1, 3→2, 4→3, 5→4, 6→5
    pub fn rotate(self) -> Self {
        if self.0 == 1 { Self(6) } else { Self(self.0 - 1) }
    }

    /// Position after `steps` rotations
    pub fn rotated(self, steps: u8) -> Self {
        (0..steps % ROTATION_CYCLE).fold(self, |pos, _| pos.rotate())
    }

    /// Front row is 2, 3 and 4; back row is 1, 5 and 6
    pub fn is_front_row(self) -> bool {
        matches!(self.0, 2..=4)
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "back right",
            2 => "front right",
            3 => "front center",
            4 => "front left",
            5 => "back left",
            _ => "back center",
        }
    }
}

impl TryFrom<u8> for CourtPosition {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CourtPosition> for u8 {
    fn from(position: CourtPosition) -> Self {
        position.0
    }
}

impl fmt::Display for CourtPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-held rotation counter in 0..6
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState(u8);

impl RotationState {
    /// Wraps any count into the cycle
    pub fn new(index: u8) -> Self {
        Self(index % ROTATION_CYCLE)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// 1-based number for display ("rotation 3/6")
    pub fn ordinal(self) -> u8 {
        self.0 + 1
    }

    pub fn advance(self) -> Self {
        Self((self.0 + 1) % ROTATION_CYCLE)
    }

    pub fn reset(self) -> Self {
        Self(0)
    }

    /// All six states in order
    pub fn cycle() -> impl Iterator<Item = RotationState> {
        (0..ROTATION_CYCLE).map(RotationState)
    }
}
