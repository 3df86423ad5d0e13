use thiserror::Error;

/// Input rejected before it reaches storage
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value}. Must be between {min} and {max}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Missing required field: {field}")]
    Required { field: String },

    #[error("Formation needs exactly 6 players, got {count}")]
    FormationSize { count: usize },

    #[error("Court position {position} is assigned more than once")]
    DuplicatePosition { position: u8 },

    #[error("Invalid court position: {value}. Must be between 1 and 6")]
    InvalidCourtPosition { value: i64 },

    #[error("Unknown player role: {value}. Must be one of OH, OP, MB, S, L")]
    UnknownRole { value: String },

    #[error("Unknown handedness: {value}. Must be 'right' or 'left'")]
    UnknownHandedness { value: String },
}

impl ValidationError {
    /// Checks `value` against an inclusive range
    pub fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), Self> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            })
        }
    }
}

/// Errors surfaced by roster operations
#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Player not found: {id}")]
    PlayerNotFound { id: String },

    #[error("Formation not found: {id}")]
    FormationNotFound { id: String },

    #[error("Condition record not found: {id}")]
    ConditionNotFound { id: String },

    #[error("Player {player_id} is part of formation(s): {}", formations.join(", "))]
    PlayerInFormation {
        player_id: String,
        formations: Vec<String>,
    },
}
