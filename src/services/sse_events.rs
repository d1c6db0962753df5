use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        common::{MatchPhaseSnapshot, ScoreboardSnapshot},
        match_flow::EventSummary,
        sse::{
            ClockEvent, EventRecordedEvent, EventUndoneEvent, PhaseChangedEvent, ScoreboardEvent,
            ServerEvent, SystemStatus,
        },
    },
    state::{SharedState, state_machine::MatchPhase},
};

const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_SCOREBOARD: &str = "scoreboard";
const EVENT_CLOCK: &str = "clock";
const EVENT_RECORDED: &str = "event.recorded";
const EVENT_UNDONE: &str = "event.undone";
const EVENT_SYSTEM_STATUS: &str = "system_status";

/// Broadcast a match phase change notification with scoreboard context.
pub async fn broadcast_phase_changed(state: &SharedState, phase: MatchPhase) {
    let snapshot = build_phase_snapshot(state, phase).await;
    send_public_event(state, EVENT_PHASE_CHANGED, &PhaseChangedEvent(snapshot));
}

/// Broadcast the scoreboard after a ledger mutation.
pub fn broadcast_scoreboard(state: &SharedState, scoreboard: ScoreboardSnapshot) {
    send_public_event(state, EVENT_SCOREBOARD, &ScoreboardEvent(scoreboard));
}

/// Broadcast a clock tick. Called from the clock task once per second.
pub fn broadcast_clock(state: &SharedState, seconds: u64) {
    let payload = ClockEvent {
        seconds,
        formatted: crate::state::ledger::format_clock(seconds),
    };
    send_public_event(state, EVENT_CLOCK, &payload);
}

/// Broadcast a freshly recorded event together with the updated scoreboard.
pub fn broadcast_event_recorded(
    state: &SharedState,
    event: EventSummary,
    scoreboard: ScoreboardSnapshot,
) {
    let payload = EventRecordedEvent { event, scoreboard };
    send_public_event(state, EVENT_RECORDED, &payload);
}

/// Broadcast the removal of the most recent event.
pub fn broadcast_event_undone(
    state: &SharedState,
    event_id: u64,
    scoreboard: ScoreboardSnapshot,
) {
    let payload = EventUndoneEvent {
        event_id,
        scoreboard,
    };
    send_public_event(state, EVENT_UNDONE, &payload);
}

/// Broadcast a degraded-mode flip to connected viewers.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_public_event(state, EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

/// Assemble the phase snapshot shared by REST and SSE payloads.
pub async fn build_phase_snapshot(state: &SharedState, phase: MatchPhase) -> MatchPhaseSnapshot {
    let scoreboard = state
        .read_current_match(|maybe| maybe.map(ScoreboardSnapshot::from))
        .await;

    MatchPhaseSnapshot {
        phase: (&phase).into(),
        degraded: state.is_degraded().await,
        scoreboard,
    }
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
