use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::history::MatchSummary, error::AppError, services::history_service, state::SharedState,
};

/// Routes exposing saved match history.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches", get(list_matches))
        .route("/matches/{id}", delete(delete_match))
}

/// List saved matches, most recent first.
#[utoipa::path(
    get,
    path = "/matches",
    tag = "history",
    responses((status = 200, description = "Saved matches", body = [MatchSummary]))
)]
pub async fn list_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    let matches = history_service::list_matches(&state).await?;
    Ok(Json(matches))
}

/// Delete a saved match, rolling its goals back out of the career totals.
#[utoipa::path(
    delete,
    path = "/matches/{id}",
    tag = "history",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses((status = 204, description = "Match deleted"))
)]
pub async fn delete_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    history_service::delete_match(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
