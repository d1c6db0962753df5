//! Business logic for the match flow. These helpers coordinate storage
//! persistence, ledger mutations, and state-machine transitions while
//! honouring the single-transition-at-a-time requirement.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::models::MatchEntity,
    dto::{
        common::ScoreboardSnapshot,
        match_flow::{
            AdjustPlayerGoalsRequest, AdjustScoreRequest, EventSummary, FinalizeSummary,
            GoalAttributionResponse, KickOffRequest, LedgerSummary, MatchPhotoRequest,
            OpponentNameRequest, RecordEventRequest, ScorerLine, SetupContext,
        },
    },
    error::ServiceError,
    state::{
        SharedState,
        clock::ClockHandle,
        ledger::{MatchLedger, SquadMember},
        state_machine::{MatchFlowEvent, MatchPhase},
        transitions::run_transition_with_broadcast,
    },
    services::sse_events,
};

/// Number of distinct recent opponents offered on the setup screen.
const RECENT_OPPONENT_LIMIT: usize = 8;

async fn ensure_phase(state: &SharedState, allowed: &[MatchPhase]) -> Result<(), ServiceError> {
    let phase = state.match_phase().await;
    if allowed.contains(&phase) {
        Ok(())
    } else {
        Err(ServiceError::InvalidState(format!(
            "operation not available in phase {phase:?}"
        )))
    }
}

/// Run a closure against the active ledger, failing when no match is in
/// progress.
async fn with_ledger_mut<F, T>(state: &SharedState, f: F) -> Result<T, ServiceError>
where
    F: FnOnce(&mut MatchLedger) -> T,
{
    let mut slot = state.current_match().write().await;
    let ledger = slot
        .as_mut()
        .ok_or_else(|| ServiceError::InvalidState("no match is in progress".into()))?;
    Ok(f(ledger))
}

async fn read_ledger<F, T>(state: &SharedState, f: F) -> Result<T, ServiceError>
where
    F: FnOnce(&MatchLedger) -> T,
{
    state
        .read_current_match(|maybe| maybe.map(f))
        .await
        .ok_or_else(|| ServiceError::InvalidState("no match is in progress".into()))
}

/// Spawn the clock tick task if it is not already running.
async fn ensure_clock_task(state: &SharedState) {
    let mut slot = state.clock_slot().lock().await;
    if slot.is_none() {
        *slot = Some(ClockHandle::spawn(state.clone()));
    }
}

/// Dispose the clock tick task so no tick can fire afterwards.
async fn stop_clock_task(state: &SharedState) {
    if let Some(handle) = state.clock_slot().lock().await.take() {
        handle.stop();
    }
}

/// Enter match setup from idle, gathering everything the setup screen needs:
/// the team name, the active roster, and recent opponents for the picker.
pub async fn begin_setup(state: &SharedState) -> Result<SetupContext, ServiceError> {
    run_transition_with_broadcast(state, MatchFlowEvent::BeginSetup, move || async move {
        let store = state.require_roster_store().await?;

        let team_name = match store.load_team_profile().await? {
            Some(profile) => profile.name,
            None => state.config().team_name().to_owned(),
        };

        let active_players: Vec<_> = store
            .list_players()
            .await?
            .into_iter()
            .filter(|player| player.is_active)
            .map(|player| {
                let member: SquadMember = player.into();
                (&member).into()
            })
            .collect();

        let recent_opponents = recent_opponents(
            store
                .list_matches()
                .await?
                .into_iter()
                .map(|record| record.opponent_name),
        );

        Ok(SetupContext {
            team_name,
            default_opponent: recent_opponents
                .first()
                .cloned()
                .unwrap_or_else(|| state.config().opponent_name().to_owned()),
            recent_opponents,
            active_players,
        })
    })
    .await
}

/// Deduplicate opponent names, keeping first occurrence order.
fn recent_opponents(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .filter_map(|name| {
            let trimmed = name.trim().to_owned();
            if trimmed.is_empty() || !seen.insert(trimmed.clone()) {
                None
            } else {
                Some(trimmed)
            }
        })
        .take(RECENT_OPPONENT_LIMIT)
        .collect()
}

/// Confirm setup and start live play: snapshot the active roster, create the
/// ledger, and enter the live phase. A blank opponent name falls back to the
/// configured default.
pub async fn kick_off(
    state: &SharedState,
    request: KickOffRequest,
) -> Result<LedgerSummary, ServiceError> {
    run_transition_with_broadcast(state, MatchFlowEvent::KickOff, move || async move {
        let store = state.require_roster_store().await?;

        let home_name = match store.load_team_profile().await? {
            Some(profile) => profile.name,
            None => state.config().team_name().to_owned(),
        };

        let opponent_name = request
            .opponent_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| state.config().opponent_name().to_owned());

        let squad: Vec<SquadMember> = store
            .list_players()
            .await?
            .into_iter()
            .filter(|player| player.is_active)
            .map(Into::into)
            .collect();

        let ledger = MatchLedger::new(home_name, opponent_name, squad);
        let summary = LedgerSummary::from(&ledger);

        {
            let mut slot = state.current_match().write().await;
            *slot = Some(ledger);
        }

        debug!(record_id = %summary.record_id, "match ledger created");
        Ok(summary)
    })
    .await
}

/// Full projection of the active ledger.
pub async fn ledger_summary(state: &SharedState) -> Result<LedgerSummary, ServiceError> {
    ensure_phase(state, &[MatchPhase::Live, MatchPhase::Review]).await?;
    read_ledger(state, |l| LedgerSummary::from(l)).await
}

/// Record a quick-entry event from the live screen.
pub async fn record_event(
    state: &SharedState,
    request: RecordEventRequest,
) -> Result<EventSummary, ServiceError> {
    ensure_phase(state, &[MatchPhase::Live]).await?;

    let (event, scoreboard) = with_ledger_mut(state, |ledger| {
        let event = EventSummary::from(ledger.record_event(request.kind.into(), request.side.into()));
        (event, ScoreboardSnapshot::from(&*ledger))
    })
    .await?;

    sse_events::broadcast_event_recorded(state, event.clone(), scoreboard);
    Ok(event)
}

/// Undo the most recent event, reversing its counter side effect. Returns
/// `None` when the log is already empty (a no-op, not an error).
pub async fn undo_last_event(state: &SharedState) -> Result<Option<EventSummary>, ServiceError> {
    ensure_phase(state, &[MatchPhase::Live]).await?;

    let (undone, scoreboard) = with_ledger_mut(state, |ledger| {
        let undone = ledger.undo_last_event().map(|event| EventSummary::from(&event));
        (undone, ScoreboardSnapshot::from(&*ledger))
    })
    .await?;

    if let Some(ref event) = undone {
        sse_events::broadcast_event_undone(state, event.id, scoreboard);
    }
    Ok(undone)
}

/// Start the elapsed clock and its tick task.
pub async fn start_clock(state: &SharedState) -> Result<ScoreboardSnapshot, ServiceError> {
    ensure_phase(state, &[MatchPhase::Live]).await?;

    let scoreboard = with_ledger_mut(state, |ledger| {
        ledger.set_clock_running(true);
        ScoreboardSnapshot::from(&*ledger)
    })
    .await?;

    ensure_clock_task(state).await;
    sse_events::broadcast_scoreboard(state, scoreboard.clone());
    Ok(scoreboard)
}

/// Pause the elapsed clock, disposing the tick task without resetting the
/// counter.
pub async fn pause_clock(state: &SharedState) -> Result<ScoreboardSnapshot, ServiceError> {
    ensure_phase(state, &[MatchPhase::Live]).await?;

    let scoreboard = with_ledger_mut(state, |ledger| {
        ledger.set_clock_running(false);
        ScoreboardSnapshot::from(&*ledger)
    })
    .await?;

    stop_clock_task(state).await;
    sse_events::broadcast_scoreboard(state, scoreboard.clone());
    Ok(scoreboard)
}

/// Zero the elapsed clock and stop it.
pub async fn reset_clock(state: &SharedState) -> Result<ScoreboardSnapshot, ServiceError> {
    ensure_phase(state, &[MatchPhase::Live]).await?;

    let scoreboard = with_ledger_mut(state, |ledger| {
        ledger.reset_clock();
        ScoreboardSnapshot::from(&*ledger)
    })
    .await?;

    stop_clock_task(state).await;
    sse_events::broadcast_scoreboard(state, scoreboard.clone());
    Ok(scoreboard)
}

/// Rename the opponent mid-match. Blank input keeps the current name rather
/// than raising an error.
pub async fn rename_opponent(
    state: &SharedState,
    request: OpponentNameRequest,
) -> Result<ScoreboardSnapshot, ServiceError> {
    ensure_phase(state, &[MatchPhase::Live, MatchPhase::Review]).await?;

    let scoreboard = with_ledger_mut(state, |ledger| {
        let next = request.name.trim();
        if !next.is_empty() {
            ledger.opponent_name = next.to_owned();
        }
        ScoreboardSnapshot::from(&*ledger)
    })
    .await?;

    sse_events::broadcast_scoreboard(state, scoreboard.clone());
    Ok(scoreboard)
}

/// Attach or replace the match photo during review.
pub async fn attach_photo(
    state: &SharedState,
    request: MatchPhotoRequest,
) -> Result<(), ServiceError> {
    ensure_phase(state, &[MatchPhase::Review]).await?;

    with_ledger_mut(state, |ledger| {
        ledger.photo = Some(request.photo);
    })
    .await
}

/// Switch from the live tab to post-match review. The ledger (and a running
/// clock) carry over untouched.
pub async fn open_review(state: &SharedState) -> Result<LedgerSummary, ServiceError> {
    run_transition_with_broadcast(state, MatchFlowEvent::OpenReview, move || async move {
        read_ledger(state, |l| LedgerSummary::from(l)).await
    })
    .await
}

/// Switch back from review to the live tab.
pub async fn resume_live(state: &SharedState) -> Result<LedgerSummary, ServiceError> {
    run_transition_with_broadcast(state, MatchFlowEvent::ResumeLive, move || async move {
        read_ledger(state, |l| LedgerSummary::from(l)).await
    })
    .await
}

/// Apply a free-form score correction during review. Deliberately appends no
/// event, so the score may diverge from the event-derived total.
pub async fn adjust_score(
    state: &SharedState,
    request: AdjustScoreRequest,
) -> Result<ScoreboardSnapshot, ServiceError> {
    ensure_phase(state, &[MatchPhase::Review]).await?;

    let scoreboard = with_ledger_mut(state, |ledger| {
        ledger.adjust_score(request.side.into(), request.delta);
        ScoreboardSnapshot::from(&*ledger)
    })
    .await?;

    sse_events::broadcast_scoreboard(state, scoreboard.clone());
    Ok(scoreboard)
}

/// Attribute goals to a squad member during review.
pub async fn adjust_player_goals(
    state: &SharedState,
    player_id: Uuid,
    request: AdjustPlayerGoalsRequest,
) -> Result<GoalAttributionResponse, ServiceError> {
    ensure_phase(state, &[MatchPhase::Review]).await?;

    with_ledger_mut(state, |ledger| {
        ledger
            .adjust_player_goals(player_id, request.delta)
            .and_then(|_| ledger.squad().get(&player_id))
            .map(|member| GoalAttributionResponse {
                player: member.into(),
                goals_to_assign: ledger.goals_to_assign(),
            })
            .ok_or_else(|| {
                ServiceError::NotFound(format!("player `{player_id}` is not in the squad"))
            })
    })
    .await?
}

/// Persist the match outcome and return to idle.
///
/// Two sequential effects: the match record is upserted first (keyed by the
/// ledger's pre-assigned id, so a retry never duplicates it), then one career
/// increment per scorer is applied, each marked on the ledger as it lands.
/// Any failure aborts the phase transition: the match stays in review with
/// the ledger intact, and a retry resumes where the last attempt stopped.
pub async fn finalize(state: &SharedState) -> Result<FinalizeSummary, ServiceError> {
    let summary = run_transition_with_broadcast(state, MatchFlowEvent::Finalize, move || async move {
        let store = state.require_roster_store().await?;

        let (record, pending): (MatchEntity, Vec<(Uuid, u32)>) =
            read_ledger(state, |ledger| {
                let pending = ledger
                    .scorers()
                    .into_iter()
                    .filter(|member| !member.career_credited)
                    .map(|member| (member.id, member.goals))
                    .collect();
                (MatchEntity::from(ledger), pending)
            })
            .await?;

        store.upsert_match(record.clone()).await?;

        for (player_id, goals) in pending {
            if let Err(err) = store.increment_career_goals(player_id, i64::from(goals)).await {
                warn!(
                    match_id = %record.id,
                    player_id = %player_id,
                    error = %err,
                    "career increment failed; match record saved, review retained for retry"
                );
                return Err(err.into());
            }

            with_ledger_mut(state, |ledger| {
                if let Some(member) = ledger.squad_member_mut(player_id) {
                    member.career_credited = true;
                }
            })
            .await?;
        }

        let summary = read_ledger(state, |ledger| FinalizeSummary {
            match_id: ledger.record_id,
            opponent_name: ledger.opponent_name.clone(),
            home_score: ledger.home_score,
            away_score: ledger.away_score,
            scorers: ledger
                .scorers()
                .into_iter()
                .map(|member| ScorerLine {
                    player_id: member.id,
                    name: member.name.clone(),
                    goals: member.goals,
                })
                .collect(),
        })
        .await?;

        // Everything persisted; the ledger can be discarded.
        stop_clock_task(state).await;
        {
            let mut slot = state.current_match().write().await;
            slot.take();
        }

        Ok(summary)
    })
    .await?;

    Ok(summary)
}

/// Discard the ledger without persisting anything. Valid from setup and
/// review only; live play must route through review first.
pub async fn abandon(state: &SharedState) -> Result<(), ServiceError> {
    run_transition_with_broadcast(state, MatchFlowEvent::Abandon, move || async move {
        stop_clock_task(state).await;
        let mut slot = state.current_match().write().await;
        slot.take();
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::PlayerEntity,
            roster_store::{RosterStore, memory::MemoryRosterStore},
        },
        dto::match_flow::{EventKindDto, TeamSideDto},
        state::AppState,
    };

    fn player(name: &str, number: u8, active: bool) -> PlayerEntity {
        PlayerEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            number,
            is_active: active,
            total_goals: 0,
            created_at: std::time::SystemTime::now(),
        }
    }

    async fn state_with_store() -> (SharedState, MemoryRosterStore, Vec<PlayerEntity>) {
        let state = AppState::new(AppConfig::default());
        let store = MemoryRosterStore::new();
        let players = vec![
            player("Taro", 7, true),
            player("Jin", 9, true),
            player("Benched", 13, false),
        ];
        for p in &players {
            store.upsert_player(p.clone()).await.unwrap();
        }
        state.install_roster_store(Arc::new(store.clone())).await;
        (state, store, players)
    }

    async fn start_match(state: &SharedState) -> LedgerSummary {
        begin_setup(state).await.unwrap();
        kick_off(
            state,
            KickOffRequest {
                opponent_name: Some("United FC".into()),
            },
        )
        .await
        .unwrap()
    }

    fn goal(side: TeamSideDto) -> RecordEventRequest {
        RecordEventRequest {
            kind: EventKindDto::Goal,
            side,
        }
    }

    #[tokio::test]
    async fn kickoff_snapshots_only_active_players() {
        let (state, _store, _players) = state_with_store().await;

        let summary = start_match(&state).await;

        assert_eq!(summary.squad.len(), 2);
        assert!(summary.squad.iter().all(|member| member.number != 13));
        assert_eq!(state.match_phase().await, MatchPhase::Live);
    }

    #[tokio::test]
    async fn blank_opponent_falls_back_to_default() {
        let (state, _store, _players) = state_with_store().await;
        begin_setup(&state).await.unwrap();

        let summary = kick_off(
            &state,
            KickOffRequest {
                opponent_name: Some("   ".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(summary.scoreboard.away_name, "United FC");
    }

    #[tokio::test]
    async fn roster_edits_do_not_touch_a_running_match() {
        let (state, store, players) = state_with_store().await;
        start_match(&state).await;

        // Deactivate a snapshotted player mid-match.
        let mut edited = players[0].clone();
        edited.is_active = false;
        store.upsert_player(edited).await.unwrap();

        let summary = ledger_summary(&state).await.unwrap();
        assert_eq!(summary.squad.len(), 2);
    }

    #[tokio::test]
    async fn record_and_undo_keep_counters_consistent() {
        let (state, _store, _players) = state_with_store().await;
        start_match(&state).await;

        record_event(&state, goal(TeamSideDto::Home)).await.unwrap();
        record_event(&state, goal(TeamSideDto::Home)).await.unwrap();

        let undone = undo_last_event(&state).await.unwrap();
        assert!(undone.is_some());

        let summary = ledger_summary(&state).await.unwrap();
        assert_eq!(summary.scoreboard.home_score, 1);
        assert_eq!(summary.events.len(), 1);

        // Draining the log leaves a no-op undo, not an error.
        undo_last_event(&state).await.unwrap();
        assert!(undo_last_event(&state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn score_corrections_require_review() {
        let (state, _store, _players) = state_with_store().await;
        start_match(&state).await;

        let err = adjust_score(
            &state,
            AdjustScoreRequest {
                side: TeamSideDto::Home,
                delta: 1,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        open_review(&state).await.unwrap();
        let scoreboard = adjust_score(
            &state,
            AdjustScoreRequest {
                side: TeamSideDto::Home,
                delta: 2,
            },
        )
        .await
        .unwrap();
        assert_eq!(scoreboard.home_score, 2);

        // Corrections append no events.
        let summary = ledger_summary(&state).await.unwrap();
        assert!(summary.events.is_empty());
    }

    #[tokio::test]
    async fn finalize_persists_record_and_career_totals_once() {
        let (state, store, players) = state_with_store().await;
        start_match(&state).await;

        for _ in 0..3 {
            record_event(&state, goal(TeamSideDto::Home)).await.unwrap();
        }
        open_review(&state).await.unwrap();

        adjust_player_goals(
            &state,
            players[0].id,
            AdjustPlayerGoalsRequest { delta: 2 },
        )
        .await
        .unwrap();
        let attribution = adjust_player_goals(
            &state,
            players[1].id,
            AdjustPlayerGoalsRequest { delta: 1 },
        )
        .await
        .unwrap();
        assert_eq!(attribution.goals_to_assign, 0);

        let summary = finalize(&state).await.unwrap();
        assert_eq!(summary.home_score, 3);
        assert_eq!(summary.scorers.len(), 2);
        assert_eq!(state.match_phase().await, MatchPhase::Idle);

        let matches = store.list_matches().await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].self_score, 3);

        let taro = store.find_player(players[0].id).await.unwrap().unwrap();
        let jin = store.find_player(players[1].id).await.unwrap().unwrap();
        assert_eq!(taro.total_goals, 2);
        assert_eq!(jin.total_goals, 1);

        // The ledger is gone; a second finalize cannot double-persist.
        let err = finalize(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert_eq!(store.list_matches().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_finalize_keeps_review_and_retry_does_not_double_credit() {
        let (state, store, players) = state_with_store().await;
        start_match(&state).await;

        record_event(&state, goal(TeamSideDto::Home)).await.unwrap();
        open_review(&state).await.unwrap();
        adjust_player_goals(
            &state,
            players[0].id,
            AdjustPlayerGoalsRequest { delta: 1 },
        )
        .await
        .unwrap();

        store.fail_career_increments(true);
        let err = finalize(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));

        // Transition aborted: still in review, ledger retained, match record
        // already written.
        assert_eq!(state.match_phase().await, MatchPhase::Review);
        assert!(ledger_summary(&state).await.is_ok());
        assert_eq!(store.list_matches().await.unwrap().len(), 1);

        store.fail_career_increments(false);
        finalize(&state).await.unwrap();

        assert_eq!(state.match_phase().await, MatchPhase::Idle);
        // Retry upserted the same record and credited the scorer exactly once.
        assert_eq!(store.list_matches().await.unwrap().len(), 1);
        let taro = store.find_player(players[0].id).await.unwrap().unwrap();
        assert_eq!(taro.total_goals, 1);
    }

    #[tokio::test]
    async fn abandon_persists_nothing() {
        let (state, store, _players) = state_with_store().await;
        start_match(&state).await;
        record_event(&state, goal(TeamSideDto::Home)).await.unwrap();
        open_review(&state).await.unwrap();

        abandon(&state).await.unwrap();

        assert_eq!(state.match_phase().await, MatchPhase::Idle);
        assert!(store.list_matches().await.unwrap().is_empty());
        assert!(ledger_summary(&state).await.is_err());
    }

    #[tokio::test]
    async fn live_cannot_abandon_directly() {
        let (state, _store, _players) = state_with_store().await;
        start_match(&state).await;

        let err = abandon(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert_eq!(state.match_phase().await, MatchPhase::Live);
    }

    #[tokio::test]
    async fn clock_pause_keeps_elapsed_value() {
        let (state, _store, _players) = state_with_store().await;
        start_match(&state).await;

        let running = start_clock(&state).await.unwrap();
        assert!(running.clock_running);

        let paused = pause_clock(&state).await.unwrap();
        assert!(!paused.clock_running);

        let reset = reset_clock(&state).await.unwrap();
        assert_eq!(reset.clock, "00:00");
    }
}
