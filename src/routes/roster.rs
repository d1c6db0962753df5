use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::roster::{CreatePlayerRequest, PlayerSummary, UpdatePlayerRequest},
    error::AppError,
    services::roster_service,
    state::SharedState,
};

/// Routes managing the roster. Edits never touch a match already in
/// progress; they only shape the next squad snapshot.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route("/players/leaderboard", get(leaderboard))
        .route("/players/{id}", put(update_player).delete(delete_player))
        .route("/players/{id}/toggle-active", post(toggle_active))
}

/// List the roster ordered by shirt number.
#[utoipa::path(
    get,
    path = "/players",
    tag = "roster",
    responses((status = 200, description = "Roster entries", body = [PlayerSummary]))
)]
pub async fn list_players(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    let players = roster_service::list_players(&state).await?;
    Ok(Json(players))
}

/// Create a roster entry.
#[utoipa::path(
    post,
    path = "/players",
    tag = "roster",
    request_body = CreatePlayerRequest,
    responses((status = 200, description = "Player created", body = PlayerSummary))
)]
pub async fn create_player(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreatePlayerRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    let player = roster_service::create_player(&state, payload).await?;
    Ok(Json(player))
}

/// Apply a partial update to a roster entry.
#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Player identifier")),
    request_body = UpdatePlayerRequest,
    responses((status = 200, description = "Player updated", body = PlayerSummary))
)]
pub async fn update_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<UpdatePlayerRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    let player = roster_service::update_player(&state, id, payload).await?;
    Ok(Json(player))
}

/// Flip a player's active flag.
#[utoipa::path(
    post,
    path = "/players/{id}/toggle-active",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Player identifier")),
    responses((status = 200, description = "Player toggled", body = PlayerSummary))
)]
pub async fn toggle_active(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerSummary>, AppError> {
    let player = roster_service::toggle_active(&state, id).await?;
    Ok(Json(player))
}

/// Remove a roster entry.
#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Player identifier")),
    responses((status = 204, description = "Player deleted"))
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    roster_service::delete_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Top scorers by career total.
#[utoipa::path(
    get,
    path = "/players/leaderboard",
    tag = "roster",
    responses((status = 200, description = "Leaderboard", body = [PlayerSummary]))
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    let players = roster_service::leaderboard(&state).await?;
    Ok(Json(players))
}
