use serde::Serialize;
use utoipa::ToSchema;

use crate::{dto::phase::VisibleMatchPhase, state::ledger::MatchLedger};

/// Informational foul threshold shown on the scoreboard. Crossing it has no
/// enforced side effect.
pub const FOUL_DISPLAY_LIMIT: u32 = 5;

/// Scoreboard projection of the active ledger shared by REST and SSE payloads.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct ScoreboardSnapshot {
    /// Managed team display name.
    pub home_name: String,
    /// Opponent display name.
    pub away_name: String,
    /// Managed team score.
    pub home_score: u32,
    /// Opponent score.
    pub away_score: u32,
    /// Managed team foul count.
    pub home_fouls: u32,
    /// Opponent foul count.
    pub away_fouls: u32,
    /// Displayed foul threshold (informational only).
    pub foul_limit: u32,
    /// Elapsed clock formatted `mm:ss`.
    pub clock: String,
    /// Whether the clock is ticking.
    pub clock_running: bool,
}

impl From<&MatchLedger> for ScoreboardSnapshot {
    fn from(ledger: &MatchLedger) -> Self {
        Self {
            home_name: ledger.home_name.clone(),
            away_name: ledger.opponent_name.clone(),
            home_score: ledger.home_score,
            away_score: ledger.away_score,
            home_fouls: ledger.home_fouls,
            away_fouls: ledger.away_fouls,
            foul_limit: FOUL_DISPLAY_LIMIT,
            clock: ledger.formatted_clock(),
            clock_running: ledger.clock_running(),
        }
    }
}

/// Shared snapshot describing the current match phase and related context.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct MatchPhaseSnapshot {
    /// Current phase.
    pub phase: VisibleMatchPhase,
    /// True when the backend operates in degraded mode (no storage connection).
    pub degraded: bool,
    /// Present while a match is in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoreboard: Option<ScoreboardSnapshot>,
}
