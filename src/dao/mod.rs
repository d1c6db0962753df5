/// Database model definitions.
pub mod models;
/// Roster, team profile, and match history storage operations.
pub mod roster_store;
/// Storage abstraction layer for database operations.
pub mod storage;
