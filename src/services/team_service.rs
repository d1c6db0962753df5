use std::time::SystemTime;

use crate::{
    dao::models::TeamProfileEntity,
    dto::team::{TeamProfileResponse, UpdateTeamProfileRequest},
    error::ServiceError,
    state::SharedState,
};

/// Load the team profile, falling back to the configured defaults when none
/// has been saved yet.
pub async fn profile(state: &SharedState) -> Result<TeamProfileResponse, ServiceError> {
    let store = state.require_roster_store().await?;
    let colors = state.config().team_colors().to_vec();

    match store.load_team_profile().await? {
        Some(profile) => Ok(TeamProfileResponse::from_profile(profile, colors)),
        None => Ok(TeamProfileResponse {
            name: state.config().team_name().to_owned(),
            color: state.config().default_color().to_owned(),
            available_colors: colors,
            updated_at: None,
        }),
    }
}

/// Save the team profile. The new name is stamped onto ledgers created by
/// subsequent kickoffs; a match already in progress keeps its snapshot.
pub async fn update_profile(
    state: &SharedState,
    request: UpdateTeamProfileRequest,
) -> Result<TeamProfileResponse, ServiceError> {
    let store = state.require_roster_store().await?;

    let profile = TeamProfileEntity {
        name: request.name.trim().to_owned(),
        color: request.color,
        updated_at: SystemTime::now(),
    };

    store.save_team_profile(profile.clone()).await?;
    Ok(TeamProfileResponse::from_profile(
        profile,
        state.config().team_colors().to_vec(),
    ))
}
