use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dao::models::MatchListItemEntity, dto::format_system_time};

/// Saved match projection returned by the history endpoints.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct MatchSummary {
    /// Stable identifier.
    pub id: Uuid,
    /// Opponent display name.
    pub opponent_name: String,
    /// Final managed-team score.
    pub self_score: u32,
    /// Final opponent score.
    pub opponent_score: u32,
    /// Date the match was played, RFC3339.
    pub match_date: String,
}

impl From<MatchListItemEntity> for MatchSummary {
    fn from(entity: MatchListItemEntity) -> Self {
        Self {
            id: entity.id,
            opponent_name: entity.opponent_name,
            self_score: entity.self_score,
            opponent_score: entity.opponent_score,
            match_date: format_system_time(entity.match_date),
        }
    }
}
