use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::PlayerEntity,
    dto::roster::{CreatePlayerRequest, PlayerSummary, UpdatePlayerRequest},
    error::ServiceError,
    state::SharedState,
};

/// Players shown on the career leaderboard.
const LEADERBOARD_LIMIT: usize = 10;

/// Return the full roster ordered by shirt number.
pub async fn list_players(state: &SharedState) -> Result<Vec<PlayerSummary>, ServiceError> {
    let store = state.require_roster_store().await?;
    let players = store.list_players().await?;
    Ok(players.into_iter().map(Into::into).collect())
}

/// Create a roster entry. New players start active with a zero career total.
pub async fn create_player(
    state: &SharedState,
    request: CreatePlayerRequest,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_roster_store().await?;

    let player = PlayerEntity {
        id: Uuid::new_v4(),
        name: request.name.trim().to_owned(),
        number: request.number,
        is_active: true,
        total_goals: 0,
        created_at: SystemTime::now(),
    };

    store.upsert_player(player.clone()).await?;
    Ok(player.into())
}

/// Apply a partial update to a roster entry.
pub async fn update_player(
    state: &SharedState,
    id: Uuid,
    request: UpdatePlayerRequest,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_roster_store().await?;

    let Some(mut player) = store.find_player(id).await? else {
        return Err(ServiceError::NotFound(format!("player `{id}` not found")));
    };

    if let Some(name) = request.name {
        player.name = name.trim().to_owned();
    }
    if let Some(number) = request.number {
        player.number = number;
    }
    if let Some(is_active) = request.is_active {
        player.is_active = is_active;
    }

    store.upsert_player(player.clone()).await?;
    Ok(player.into())
}

/// Flip a player's active flag. Only affects the squad snapshot taken at the
/// next kickoff, never a match already in progress.
pub async fn toggle_active(state: &SharedState, id: Uuid) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_roster_store().await?;

    let Some(mut player) = store.find_player(id).await? else {
        return Err(ServiceError::NotFound(format!("player `{id}` not found")));
    };

    player.is_active = !player.is_active;
    store.upsert_player(player.clone()).await?;
    Ok(player.into())
}

/// Remove a roster entry.
pub async fn delete_player(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_roster_store().await?;

    if store.delete_player(id).await? {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("player `{id}` not found")))
    }
}

/// Top scorers by career total, capped at ten entries.
pub async fn leaderboard(state: &SharedState) -> Result<Vec<PlayerSummary>, ServiceError> {
    let store = state.require_roster_store().await?;

    let mut players: Vec<_> = store
        .list_players()
        .await?
        .into_iter()
        .filter(|player| player.total_goals > 0)
        .collect();
    players.sort_by(|a, b| b.total_goals.cmp(&a.total_goals));
    players.truncate(LEADERBOARD_LIMIT);

    Ok(players.into_iter().map(Into::into).collect())
}
