use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{
    common::{MatchPhaseSnapshot, ScoreboardSnapshot},
    match_flow::EventSummary,
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event with a pre-rendered data payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream.
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast whenever the match phase changes.
pub struct PhaseChangedEvent(pub MatchPhaseSnapshot);

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast after every ledger mutation that touches the scoreboard.
pub struct ScoreboardEvent(pub ScoreboardSnapshot);

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once per second while the match clock is running.
pub struct ClockEvent {
    /// Elapsed seconds.
    pub seconds: u64,
    /// Elapsed clock formatted `mm:ss`.
    pub formatted: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a quick-entry event lands in the ledger.
pub struct EventRecordedEvent {
    /// The recorded event.
    pub event: EventSummary,
    /// Scoreboard after the side effect was applied.
    pub scoreboard: ScoreboardSnapshot,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the most recent event is undone.
pub struct EventUndoneEvent {
    /// Identifier of the removed event.
    pub event_id: u64,
    /// Scoreboard after the side effect was reversed.
    pub scoreboard: ScoreboardSnapshot,
}
