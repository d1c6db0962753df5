use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        common::{MatchPhaseSnapshot, ScoreboardSnapshot},
        match_flow::{
            AdjustPlayerGoalsRequest, AdjustScoreRequest, EventSummary, FinalizeSummary,
            GoalAttributionResponse, KickOffRequest, LedgerSummary, MatchPhotoRequest,
            OpponentNameRequest, RecordEventRequest, SetupContext,
        },
    },
    error::AppError,
    services::{match_service, sse_events},
    state::SharedState,
};

/// Routes driving the match flow from setup through finalize.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/match", get(current_match))
        .route("/match/phase", get(current_phase))
        .route("/match/setup", post(begin_setup))
        .route("/match/kickoff", post(kick_off))
        .route("/match/events", post(record_event))
        .route("/match/events/undo", post(undo_last_event))
        .route("/match/clock/start", post(start_clock))
        .route("/match/clock/pause", post(pause_clock))
        .route("/match/clock/reset", post(reset_clock))
        .route("/match/opponent", put(rename_opponent))
        .route("/match/photo", put(attach_photo))
        .route("/match/review", post(open_review))
        .route("/match/resume", post(resume_live))
        .route("/match/score", post(adjust_score))
        .route("/match/players/{id}/goals", post(adjust_player_goals))
        .route("/match/finalize", post(finalize))
        .route("/match/abandon", post(abandon))
}

/// Return the full projection of the active match ledger.
#[utoipa::path(
    get,
    path = "/match",
    tag = "match",
    responses(
        (status = 200, description = "Active match state", body = LedgerSummary),
        (status = 409, description = "No match in progress")
    )
)]
pub async fn current_match(
    State(state): State<SharedState>,
) -> Result<Json<LedgerSummary>, AppError> {
    let summary = match_service::ledger_summary(&state).await?;
    Ok(Json(summary))
}

/// Return the current match phase so clients can sync on connect.
#[utoipa::path(
    get,
    path = "/match/phase",
    tag = "match",
    responses(
        (status = 200, description = "Current phase", body = MatchPhaseSnapshot)
    )
)]
pub async fn current_phase(State(state): State<SharedState>) -> Json<MatchPhaseSnapshot> {
    let phase = state.match_phase().await;
    Json(sse_events::build_phase_snapshot(&state, phase).await)
}

/// Enter match setup, returning the context for the setup screen.
#[utoipa::path(
    post,
    path = "/match/setup",
    tag = "match",
    responses(
        (status = 200, description = "Setup context", body = SetupContext)
    )
)]
pub async fn begin_setup(
    State(state): State<SharedState>,
) -> Result<Json<SetupContext>, AppError> {
    let context = match_service::begin_setup(&state).await?;
    Ok(Json(context))
}

/// Confirm setup, snapshot the squad, and start live play.
#[utoipa::path(
    post,
    path = "/match/kickoff",
    tag = "match",
    request_body = KickOffRequest,
    responses(
        (status = 200, description = "Match started", body = LedgerSummary)
    )
)]
pub async fn kick_off(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<KickOffRequest>>,
) -> Result<Json<LedgerSummary>, AppError> {
    let summary = match_service::kick_off(&state, payload).await?;
    Ok(Json(summary))
}

/// Record a quick-entry event (goal, foul, or substitution).
#[utoipa::path(
    post,
    path = "/match/events",
    tag = "match",
    request_body = RecordEventRequest,
    responses(
        (status = 200, description = "Event recorded", body = EventSummary)
    )
)]
pub async fn record_event(
    State(state): State<SharedState>,
    Json(payload): Json<RecordEventRequest>,
) -> Result<Json<EventSummary>, AppError> {
    let event = match_service::record_event(&state, payload).await?;
    Ok(Json(event))
}

/// Undo the most recent event; a no-op on an empty log.
#[utoipa::path(
    post,
    path = "/match/events/undo",
    tag = "match",
    responses(
        (status = 200, description = "Removed event, or null when the log was empty", body = EventSummary)
    )
)]
pub async fn undo_last_event(
    State(state): State<SharedState>,
) -> Result<Json<Option<EventSummary>>, AppError> {
    let undone = match_service::undo_last_event(&state).await?;
    Ok(Json(undone))
}

/// Start the elapsed clock.
#[utoipa::path(
    post,
    path = "/match/clock/start",
    tag = "match",
    responses((status = 200, description = "Clock running", body = ScoreboardSnapshot))
)]
pub async fn start_clock(
    State(state): State<SharedState>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    let scoreboard = match_service::start_clock(&state).await?;
    Ok(Json(scoreboard))
}

/// Pause the elapsed clock without resetting it.
#[utoipa::path(
    post,
    path = "/match/clock/pause",
    tag = "match",
    responses((status = 200, description = "Clock paused", body = ScoreboardSnapshot))
)]
pub async fn pause_clock(
    State(state): State<SharedState>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    let scoreboard = match_service::pause_clock(&state).await?;
    Ok(Json(scoreboard))
}

/// Zero the elapsed clock and stop it.
#[utoipa::path(
    post,
    path = "/match/clock/reset",
    tag = "match",
    responses((status = 200, description = "Clock reset", body = ScoreboardSnapshot))
)]
pub async fn reset_clock(
    State(state): State<SharedState>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    let scoreboard = match_service::reset_clock(&state).await?;
    Ok(Json(scoreboard))
}

/// Rename the opponent mid-match; blank input keeps the current name.
#[utoipa::path(
    put,
    path = "/match/opponent",
    tag = "match",
    request_body = OpponentNameRequest,
    responses((status = 200, description = "Opponent renamed", body = ScoreboardSnapshot))
)]
pub async fn rename_opponent(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<OpponentNameRequest>>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    let scoreboard = match_service::rename_opponent(&state, payload).await?;
    Ok(Json(scoreboard))
}

/// Attach or replace the match photo during review.
#[utoipa::path(
    put,
    path = "/match/photo",
    tag = "match",
    request_body = MatchPhotoRequest,
    responses((status = 204, description = "Photo attached"))
)]
pub async fn attach_photo(
    State(state): State<SharedState>,
    Json(payload): Json<MatchPhotoRequest>,
) -> Result<StatusCode, AppError> {
    match_service::attach_photo(&state, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Switch to the post-match review tab.
#[utoipa::path(
    post,
    path = "/match/review",
    tag = "match",
    responses((status = 200, description = "Review opened", body = LedgerSummary))
)]
pub async fn open_review(
    State(state): State<SharedState>,
) -> Result<Json<LedgerSummary>, AppError> {
    let summary = match_service::open_review(&state).await?;
    Ok(Json(summary))
}

/// Switch back to the live tab.
#[utoipa::path(
    post,
    path = "/match/resume",
    tag = "match",
    responses((status = 200, description = "Live play resumed", body = LedgerSummary))
)]
pub async fn resume_live(
    State(state): State<SharedState>,
) -> Result<Json<LedgerSummary>, AppError> {
    let summary = match_service::resume_live(&state).await?;
    Ok(Json(summary))
}

/// Apply a free-form score correction during review.
#[utoipa::path(
    post,
    path = "/match/score",
    tag = "match",
    request_body = AdjustScoreRequest,
    responses((status = 200, description = "Score adjusted", body = ScoreboardSnapshot))
)]
pub async fn adjust_score(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<AdjustScoreRequest>>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    let scoreboard = match_service::adjust_score(&state, payload).await?;
    Ok(Json(scoreboard))
}

/// Attribute goals to a squad member during review.
#[utoipa::path(
    post,
    path = "/match/players/{id}/goals",
    tag = "match",
    params(("id" = Uuid, Path, description = "Squad member identifier")),
    request_body = AdjustPlayerGoalsRequest,
    responses((status = 200, description = "Attribution updated", body = GoalAttributionResponse))
)]
pub async fn adjust_player_goals(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<AdjustPlayerGoalsRequest>>,
) -> Result<Json<GoalAttributionResponse>, AppError> {
    let response = match_service::adjust_player_goals(&state, id, payload).await?;
    Ok(Json(response))
}

/// Persist the match outcome and return to idle. On failure the match stays
/// in review with all state intact so the save can be retried.
#[utoipa::path(
    post,
    path = "/match/finalize",
    tag = "match",
    responses(
        (status = 200, description = "Match persisted", body = FinalizeSummary),
        (status = 503, description = "Save failed; review retained for retry")
    )
)]
pub async fn finalize(
    State(state): State<SharedState>,
) -> Result<Json<FinalizeSummary>, AppError> {
    let summary = match_service::finalize(&state).await?;
    Ok(Json(summary))
}

/// Discard the match without persisting anything.
#[utoipa::path(
    post,
    path = "/match/abandon",
    tag = "match",
    responses((status = 204, description = "Match discarded"))
)]
pub async fn abandon(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    match_service::abandon(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}
