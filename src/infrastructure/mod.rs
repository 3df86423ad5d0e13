pub mod persistence;
pub mod repositories;
pub mod roster_file;

pub use persistence::Database;
pub use repositories::{
    InMemoryConditionRepository, InMemoryFormationRepository, InMemoryPlayerRepository,
};
