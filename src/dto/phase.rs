use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::MatchPhase;

/// Publicly visible match phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum VisibleMatchPhase {
    /// No match in progress.
    Idle,
    /// Opponent and squad being confirmed.
    Setup,
    /// Live play.
    Live,
    /// Post-match review.
    Review,
}

impl From<&MatchPhase> for VisibleMatchPhase {
    fn from(value: &MatchPhase) -> Self {
        match value {
            MatchPhase::Idle => VisibleMatchPhase::Idle,
            MatchPhase::Setup => VisibleMatchPhase::Setup,
            MatchPhase::Live => VisibleMatchPhase::Live,
            MatchPhase::Review => VisibleMatchPhase::Review,
        }
    }
}
