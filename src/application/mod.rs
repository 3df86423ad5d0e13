pub mod bootstrap;

// Validating facade over the repositories
pub mod roster_service;

// Roster file import with demo condition history
pub mod seeding;

// Console and JSON output
pub mod reporting;
