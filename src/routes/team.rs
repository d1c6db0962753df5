use axum::{Json, Router, extract::State, routing::get};
use axum_valid::Valid;

use crate::{
    dto::team::{TeamProfileResponse, UpdateTeamProfileRequest},
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Routes managing the team profile.
pub fn router() -> Router<SharedState> {
    Router::new().route("/team", get(profile).put(update_profile))
}

/// Return the team profile and the selectable color set.
#[utoipa::path(
    get,
    path = "/team",
    tag = "team",
    responses((status = 200, description = "Team profile", body = TeamProfileResponse))
)]
pub async fn profile(
    State(state): State<SharedState>,
) -> Result<Json<TeamProfileResponse>, AppError> {
    let profile = team_service::profile(&state).await?;
    Ok(Json(profile))
}

/// Save the team profile.
#[utoipa::path(
    put,
    path = "/team",
    tag = "team",
    request_body = UpdateTeamProfileRequest,
    responses((status = 200, description = "Profile saved", body = TeamProfileResponse))
)]
pub async fn update_profile(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<UpdateTeamProfileRequest>>,
) -> Result<Json<TeamProfileResponse>, AppError> {
    let profile = team_service::update_profile(&state, payload).await?;
    Ok(Json(profile))
}
