use crate::{
    dto::card::ResultCardData,
    error::ServiceError,
    state::{SharedState, state_machine::MatchPhase},
};

/// Assemble the data snapshot behind the shareable result card from the
/// active ledger. Works during live play and review alike; a failure here
/// never touches ledger state.
pub async fn result_card(state: &SharedState) -> Result<ResultCardData, ServiceError> {
    let phase = state.match_phase().await;
    if !matches!(phase, MatchPhase::Live | MatchPhase::Review) {
        return Err(ServiceError::InvalidState(format!(
            "no match to export a card for (phase {phase:?})"
        )));
    }

    // The card renders fine with the default color when storage is down.
    let team_color = match state.roster_store().await {
        Some(store) => store
            .load_team_profile()
            .await
            .ok()
            .flatten()
            .map(|profile| profile.color)
            .unwrap_or_else(|| state.config().default_color().to_owned()),
        None => state.config().default_color().to_owned(),
    };

    state
        .read_current_match(|maybe| {
            maybe.map(|ledger| ResultCardData::from_ledger(ledger, team_color))
        })
        .await
        .ok_or_else(|| ServiceError::InvalidState("no match is in progress".into()))
}
