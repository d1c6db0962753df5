use serde::Serialize;
use utoipa::ToSchema;

use crate::{dto::format_system_time, state::ledger::MatchLedger};

/// Snapshot backing the shareable result card. Rasterization happens on the
/// client; this endpoint only fixes the data shape.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultCardData {
    /// Managed team display name.
    pub home_team: String,
    /// Opponent display name.
    pub away_team: String,
    /// Managed team score.
    pub home_score: u32,
    /// Opponent score.
    pub away_score: u32,
    /// Date the match was played, RFC3339.
    pub date: String,
    /// Team display color as `#rrggbb`.
    pub team_color: String,
    /// Match photo data URL, when one was attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Scorer line, e.g. `"Taro x2, Jin"`; empty when nobody scored.
    pub scorers: String,
    /// Whether attributed goals sum to the team score.
    pub reconciled: bool,
}

impl ResultCardData {
    /// Build the card data from a ledger snapshot and the profile color.
    pub fn from_ledger(ledger: &MatchLedger, team_color: String) -> Self {
        Self {
            home_team: ledger.home_name.clone(),
            away_team: ledger.opponent_name.clone(),
            home_score: ledger.home_score,
            away_score: ledger.away_score,
            date: format_system_time(ledger.started_at),
            team_color,
            photo: ledger.photo.clone(),
            scorers: ledger.scorer_summary(),
            reconciled: ledger.goals_to_assign() == 0,
        }
    }
}
