use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::history::MatchSummary, error::ServiceError, state::SharedState,
};

/// Saved matches, most recent first.
pub async fn list_matches(state: &SharedState) -> Result<Vec<MatchSummary>, ServiceError> {
    let store = state.require_roster_store().await?;
    let matches = store.list_matches().await?;
    Ok(matches.into_iter().map(Into::into).collect())
}

/// Delete a saved match and roll its goal attribution back out of the career
/// totals, one decrement per recorded scorer.
pub async fn delete_match(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_roster_store().await?;

    let Some(record) = store.delete_match(id).await? else {
        return Err(ServiceError::NotFound(format!("match `{id}` not found")));
    };

    for scorer in &record.scorers {
        if let Err(err) = store
            .increment_career_goals(scorer.player_id, -i64::from(scorer.goals))
            .await
        {
            // The record is already gone; surface the failure so the caller
            // knows some career totals were left uncompensated.
            warn!(
                match_id = %id,
                player_id = %scorer.player_id,
                error = %err,
                "failed to roll back career goals after match deletion"
            );
            return Err(err.into());
        }
    }

    Ok(())
}
