pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{MatchEntity, MatchListItemEntity, PlayerEntity, TeamProfileEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for the roster, the team profile,
/// and finalized match records.
///
/// The match ledger depends on this capability but does not own it; tests
/// substitute the in-memory implementation.
pub trait RosterStore: Send + Sync {
    /// All roster entries, ordered by shirt number.
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Fetch a single roster entry.
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Create or replace a roster entry.
    fn upsert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Remove a roster entry; returns whether it existed.
    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Load the singleton team profile, if one has been saved.
    fn load_team_profile(&self) -> BoxFuture<'static, StorageResult<Option<TeamProfileEntity>>>;
    /// Create or replace the singleton team profile.
    fn save_team_profile(
        &self,
        profile: TeamProfileEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Create or replace a match record keyed by its id. Fails with
    /// [`StorageError::UnknownPlayer`](crate::dao::storage::StorageError) when
    /// a scorer references a player id that is not in the roster.
    fn upsert_match(&self, record: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Apply a delta to a player's career goal total atomically on the
    /// storage side. Negative deltas are used when a match is deleted.
    fn increment_career_goals(
        &self,
        player_id: Uuid,
        delta: i64,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Saved matches, most recent first.
    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchListItemEntity>>>;
    /// Remove a match record, returning it so career totals can be
    /// compensated.
    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a dropped connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
