use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Roster entry persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Shirt number.
    pub number: u8,
    /// Whether the player is selected into the next match's squad snapshot.
    pub is_active: bool,
    /// Cumulative career goal total across all finalized matches.
    pub total_goals: u32,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
}

/// Team profile persisted as a singleton: the managed team's identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamProfileEntity {
    /// Team display name, stamped onto new match ledgers as the home name.
    pub name: String,
    /// Display color as a `#rrggbb` hex string.
    pub color: String,
    /// Last time the profile was updated.
    pub updated_at: SystemTime,
}

/// Per-player goal attribution attached to a saved match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchScorerEntity {
    /// Roster reference of the scorer.
    pub player_id: Uuid,
    /// Goals attributed to that player in this match.
    pub goals: u32,
}

/// Finalized match record persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Primary key of the match; assigned when the ledger is created so a
    /// retried finalize upserts rather than duplicates.
    pub id: Uuid,
    /// Opponent display name.
    pub opponent_name: String,
    /// Final score of the managed team.
    pub self_score: u32,
    /// Final score of the opponent.
    pub opponent_score: u32,
    /// Wall-clock date the match was played.
    pub match_date: SystemTime,
    /// Elapsed seconds on the match clock at finalize time.
    pub duration_seconds: u64,
    /// Optional match photo as a data URL.
    pub photo_url: Option<String>,
    /// Goal attribution per scoring player.
    pub scorers: Vec<MatchScorerEntity>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
}

/// Subset of [`MatchEntity`] returned by match-history listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchListItemEntity {
    /// Primary key of the match.
    pub id: Uuid,
    /// Opponent display name.
    pub opponent_name: String,
    /// Final score of the managed team.
    pub self_score: u32,
    /// Final score of the opponent.
    pub opponent_score: u32,
    /// Wall-clock date the match was played.
    pub match_date: SystemTime,
}

impl From<MatchEntity> for MatchListItemEntity {
    fn from(entity: MatchEntity) -> Self {
        Self {
            id: entity.id,
            opponent_name: entity.opponent_name,
            self_score: entity.self_score,
            opponent_score: entity.opponent_score,
            match_date: entity.match_date,
        }
    }
}
