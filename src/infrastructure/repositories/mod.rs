mod in_memory;

pub use in_memory::{InMemoryConditionRepository, InMemoryFormationRepository, InMemoryPlayerRepository};
