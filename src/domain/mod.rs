// Court positions and rotation
pub mod court;

// Roster records
pub mod condition;
pub mod formation;
pub mod player;

// Performance model
pub mod scoring;

// Rotation simulation
pub mod simulation;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
