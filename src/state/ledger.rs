use std::time::SystemTime;

use indexmap::IndexMap;
use uuid::Uuid;

use crate::dao::models::{MatchEntity, MatchScorerEntity, PlayerEntity};

/// Which side of the scoreboard an event or adjustment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    /// The managed team.
    Home,
    /// The opponent of the day.
    Away,
}

/// Discrete occurrence recorded during live play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A goal; drives the score counter for its side.
    Goal,
    /// A foul; drives the foul counter for its side.
    Foul,
    /// A substitution; no counter side effect.
    Substitution,
}

/// Timestamped entry in the match event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// Monotonically assigned identifier, unique within one ledger.
    pub id: u64,
    /// What happened.
    pub kind: EventKind,
    /// Which side it happened for.
    pub side: TeamSide,
    /// Elapsed-clock value at recording time, formatted `mm:ss`.
    pub timestamp: String,
    /// Roster reference when the scorer is known; quick-actions leave it empty.
    pub player_id: Option<Uuid>,
}

/// Point-in-time copy of a roster entry selected into the current match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadMember {
    /// Stable roster identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Shirt number.
    pub number: u8,
    /// Goals attributed to this player for this match only.
    pub goals: u32,
    /// Career total at snapshot time, carried for display.
    pub career_goals: u32,
    /// Whether this player's career total has already received the
    /// per-match delta during a (possibly retried) finalize pass.
    pub career_credited: bool,
}

impl From<PlayerEntity> for SquadMember {
    fn from(player: PlayerEntity) -> Self {
        Self {
            id: player.id,
            name: player.name,
            number: player.number,
            goals: 0,
            career_goals: player.total_goals,
            career_credited: false,
        }
    }
}

/// In-memory record of one match: scores, fouls, the event log, the squad
/// snapshot with per-player goal attribution, and the elapsed clock.
///
/// Scores and fouls are only ever mutated through [`MatchLedger::record_event`],
/// [`MatchLedger::undo_last_event`] and the post-match correction operations;
/// the event log is the source of truth during live play, while free-form
/// corrections deliberately bypass it (see [`MatchLedger::adjust_score`]).
#[derive(Debug, Clone)]
pub struct MatchLedger {
    /// Identifier the persisted match record will carry. Assigned up front so
    /// a retried finalize upserts the same record instead of inserting twice.
    pub record_id: Uuid,
    /// Name of the managed team, stamped from the team profile at kickoff.
    pub home_name: String,
    /// Opponent display name; editable during live play.
    pub opponent_name: String,
    /// Goals counted for the managed team.
    pub home_score: u32,
    /// Goals counted for the opponent.
    pub away_score: u32,
    /// Fouls counted for the managed team. The 5-foul threshold is
    /// informational only; nothing blocks further fouls.
    pub home_fouls: u32,
    /// Fouls counted for the opponent.
    pub away_fouls: u32,
    /// Optional match photo as a data URL, attached during review.
    pub photo: Option<String>,
    /// Wall-clock moment the ledger was created.
    pub started_at: SystemTime,
    squad: IndexMap<Uuid, SquadMember>,
    events: Vec<MatchEvent>,
    next_event_id: u64,
    elapsed_seconds: u64,
    clock_running: bool,
}

impl MatchLedger {
    /// Build a fresh ledger for a match against `opponent_name`, snapshotting
    /// the provided squad. All counters start at zero and the clock is stopped.
    pub fn new(home_name: String, opponent_name: String, squad: Vec<SquadMember>) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            home_name,
            opponent_name,
            home_score: 0,
            away_score: 0,
            home_fouls: 0,
            away_fouls: 0,
            photo: None,
            started_at: SystemTime::now(),
            squad: squad.into_iter().map(|member| (member.id, member)).collect(),
            events: Vec::new(),
            next_event_id: 0,
            elapsed_seconds: 0,
            clock_running: false,
        }
    }

    /// Events recorded so far, most recent first.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Squad snapshot in roster order.
    pub fn squad(&self) -> &IndexMap<Uuid, SquadMember> {
        &self.squad
    }

    /// Mutable access to one squad member, used by finalize to mark career
    /// credits as they land.
    pub fn squad_member_mut(&mut self, player_id: Uuid) -> Option<&mut SquadMember> {
        self.squad.get_mut(&player_id)
    }

    /// Record an event stamped with the current elapsed clock, applying its
    /// counter side effect. Always succeeds; the clock may be paused or at
    /// `00:00`.
    pub fn record_event(&mut self, kind: EventKind, side: TeamSide) -> &MatchEvent {
        let event = MatchEvent {
            id: self.next_event_id,
            kind,
            side,
            timestamp: format_clock(self.elapsed_seconds),
            player_id: None,
        };
        self.next_event_id += 1;

        match (kind, side) {
            (EventKind::Goal, TeamSide::Home) => self.home_score += 1,
            (EventKind::Goal, TeamSide::Away) => self.away_score += 1,
            (EventKind::Foul, TeamSide::Home) => self.home_fouls += 1,
            (EventKind::Foul, TeamSide::Away) => self.away_fouls += 1,
            (EventKind::Substitution, _) => {}
        }

        self.events.insert(0, event);
        &self.events[0]
    }

    /// Remove the most recent event and reverse its counter side effect,
    /// clamping at zero. No-op on an empty log. Only the head of the log is
    /// reversible; repeated calls walk backward one event at a time.
    pub fn undo_last_event(&mut self) -> Option<MatchEvent> {
        if self.events.is_empty() {
            return None;
        }

        let event = self.events.remove(0);
        match (event.kind, event.side) {
            (EventKind::Goal, TeamSide::Home) => {
                self.home_score = self.home_score.saturating_sub(1);
            }
            (EventKind::Goal, TeamSide::Away) => {
                self.away_score = self.away_score.saturating_sub(1);
            }
            (EventKind::Foul, TeamSide::Home) => {
                self.home_fouls = self.home_fouls.saturating_sub(1);
            }
            (EventKind::Foul, TeamSide::Away) => {
                self.away_fouls = self.away_fouls.saturating_sub(1);
            }
            (EventKind::Substitution, _) => {}
        }

        Some(event)
    }

    /// Free-form post-match score correction. Applies `delta` with a floor of
    /// zero and deliberately appends no event, so the score may diverge from
    /// the event-derived total. Returns the new value.
    pub fn adjust_score(&mut self, side: TeamSide, delta: i32) -> u32 {
        let cell = match side {
            TeamSide::Home => &mut self.home_score,
            TeamSide::Away => &mut self.away_score,
        };
        *cell = clamped_add(*cell, delta);
        *cell
    }

    /// Attribute goals to a squad member for this match, clamped at zero and
    /// independent of the team score. Returns the new per-match count, or
    /// `None` when the player is not part of the squad snapshot.
    pub fn adjust_player_goals(&mut self, player_id: Uuid, delta: i32) -> Option<u32> {
        let member = self.squad.get_mut(&player_id)?;
        member.goals = clamped_add(member.goals, delta);
        Some(member.goals)
    }

    /// Sum of per-player attributed goals.
    pub fn assigned_goals(&self) -> u32 {
        self.squad.values().map(|member| member.goals).sum()
    }

    /// Advisory reconciliation gap: home score minus attributed goals. Zero
    /// means fully reconciled, positive means goals still unassigned, negative
    /// means over-assigned. Display-only; nothing blocks on a mismatch.
    pub fn goals_to_assign(&self) -> i64 {
        i64::from(self.home_score) - i64::from(self.assigned_goals())
    }

    /// Squad members with at least one attributed goal, in roster order.
    pub fn scorers(&self) -> Vec<&SquadMember> {
        self.squad.values().filter(|member| member.goals > 0).collect()
    }

    /// Scorer line for the result card: `"Taro x2, Jin"` (the `xN` multiplier
    /// is omitted for single goals). Empty string when nobody scored.
    pub fn scorer_summary(&self) -> String {
        self.scorers()
            .into_iter()
            .map(|member| {
                if member.goals > 1 {
                    format!("{} x{}", member.name, member.goals)
                } else {
                    member.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Advance the clock by one second if it is running. Returns the new
    /// elapsed value when a tick was applied.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.clock_running {
            return None;
        }
        self.elapsed_seconds += 1;
        Some(self.elapsed_seconds)
    }

    /// Start or pause the elapsed clock. Pausing never resets the counter.
    pub fn set_clock_running(&mut self, running: bool) {
        self.clock_running = running;
    }

    /// Zero the clock and stop it.
    pub fn reset_clock(&mut self) {
        self.elapsed_seconds = 0;
        self.clock_running = false;
    }

    /// Whether the clock is currently ticking.
    pub fn clock_running(&self) -> bool {
        self.clock_running
    }

    /// Seconds elapsed on the match clock.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Current clock value formatted `mm:ss`.
    pub fn formatted_clock(&self) -> String {
        format_clock(self.elapsed_seconds)
    }
}

/// Render an elapsed-seconds value as a zero-padded `mm:ss` string.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn clamped_add(value: u32, delta: i32) -> u32 {
    i64::from(value)
        .saturating_add(i64::from(delta))
        .max(0)
        .try_into()
        .unwrap_or(u32::MAX)
}

impl From<&MatchLedger> for MatchEntity {
    fn from(ledger: &MatchLedger) -> Self {
        Self {
            id: ledger.record_id,
            opponent_name: ledger.opponent_name.clone(),
            self_score: ledger.home_score,
            opponent_score: ledger.away_score,
            match_date: ledger.started_at,
            duration_seconds: ledger.elapsed_seconds,
            photo_url: ledger.photo.clone(),
            scorers: ledger
                .scorers()
                .into_iter()
                .map(|member| MatchScorerEntity {
                    player_id: member.id,
                    goals: member.goals,
                })
                .collect(),
            created_at: SystemTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: Uuid, name: &str, number: u8) -> SquadMember {
        SquadMember {
            id,
            name: name.into(),
            number,
            goals: 0,
            career_goals: 0,
            career_credited: false,
        }
    }

    fn ledger_with_squad() -> (MatchLedger, Uuid, Uuid) {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let squad = vec![member(a, "A", 7), member(b, "B", 9)];
        (MatchLedger::new("My Team".into(), "United FC".into(), squad), a, b)
    }

    fn empty_ledger() -> MatchLedger {
        MatchLedger::new("My Team".into(), "United FC".into(), Vec::new())
    }

    #[test]
    fn goal_events_drive_the_score() {
        let mut ledger = empty_ledger();

        ledger.record_event(EventKind::Goal, TeamSide::Home);
        ledger.record_event(EventKind::Goal, TeamSide::Home);

        assert_eq!(ledger.home_score, 2);
        assert_eq!(ledger.away_score, 0);
        assert_eq!(ledger.events().len(), 2);
    }

    #[test]
    fn undo_removes_the_most_recent_event_and_reverses_it() {
        let mut ledger = empty_ledger();
        ledger.record_event(EventKind::Goal, TeamSide::Home);
        let second_id = ledger.record_event(EventKind::Goal, TeamSide::Home).id;

        let undone = ledger.undo_last_event().expect("an event to undo");

        assert_eq!(undone.id, second_id);
        assert_eq!(ledger.home_score, 1);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn undo_on_empty_ledger_is_a_noop() {
        let mut ledger = empty_ledger();

        assert!(ledger.undo_last_event().is_none());
        assert_eq!(ledger.home_score, 0);
        assert_eq!(ledger.away_score, 0);
        assert_eq!(ledger.home_fouls, 0);
        assert_eq!(ledger.away_fouls, 0);
    }

    #[test]
    fn undo_is_a_true_inverse_over_any_sequence() {
        let mut ledger = empty_ledger();

        ledger.record_event(EventKind::Goal, TeamSide::Home);
        ledger.record_event(EventKind::Foul, TeamSide::Away);
        ledger.record_event(EventKind::Substitution, TeamSide::Home);
        ledger.record_event(EventKind::Goal, TeamSide::Away);

        while ledger.undo_last_event().is_some() {}

        assert_eq!(ledger.events().len(), 0);
        assert_eq!(ledger.home_score, 0);
        assert_eq!(ledger.away_score, 0);
        assert_eq!(ledger.home_fouls, 0);
        assert_eq!(ledger.away_fouls, 0);
    }

    #[test]
    fn event_ids_are_strictly_increasing() {
        let mut ledger = empty_ledger();
        let first = ledger.record_event(EventKind::Foul, TeamSide::Home).id;
        let second = ledger.record_event(EventKind::Goal, TeamSide::Away).id;
        ledger.undo_last_event();
        let third = ledger.record_event(EventKind::Goal, TeamSide::Away).id;

        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn fifth_foul_has_no_enforced_side_effect() {
        let mut ledger = empty_ledger();

        for _ in 0..5 {
            ledger.record_event(EventKind::Foul, TeamSide::Away);
        }
        assert_eq!(ledger.away_fouls, 5);

        // Crossing the displayed threshold blocks nothing.
        ledger.record_event(EventKind::Foul, TeamSide::Away);
        assert_eq!(ledger.away_fouls, 6);
    }

    #[test]
    fn substitution_touches_no_counter() {
        let mut ledger = empty_ledger();

        ledger.record_event(EventKind::Substitution, TeamSide::Away);

        assert_eq!(ledger.events().len(), 1);
        assert_eq!(ledger.away_score, 0);
        assert_eq!(ledger.away_fouls, 0);
    }

    #[test]
    fn free_form_correction_diverges_from_the_event_log() {
        let mut ledger = empty_ledger();
        ledger.record_event(EventKind::Goal, TeamSide::Home);
        ledger.record_event(EventKind::Goal, TeamSide::Home);

        let corrected = ledger.adjust_score(TeamSide::Home, 1);

        assert_eq!(corrected, 3);
        // No synthetic event is appended for the correction.
        assert_eq!(ledger.events().len(), 2);
    }

    #[test]
    fn score_and_player_goal_adjustments_clamp_at_zero() {
        let (mut ledger, a, _) = ledger_with_squad();

        assert_eq!(ledger.adjust_score(TeamSide::Home, -10), 0);
        assert_eq!(ledger.adjust_score(TeamSide::Away, i32::MIN), 0);
        assert_eq!(ledger.adjust_player_goals(a, -3), Some(0));
    }

    #[test]
    fn adjusting_goals_for_an_unknown_player_is_rejected() {
        let (mut ledger, _, _) = ledger_with_squad();
        assert_eq!(ledger.adjust_player_goals(Uuid::new_v4(), 1), None);
    }

    #[test]
    fn full_attribution_reconciles_to_zero() {
        let (mut ledger, a, b) = ledger_with_squad();
        for _ in 0..3 {
            ledger.record_event(EventKind::Goal, TeamSide::Home);
        }

        ledger.adjust_player_goals(a, 2);
        ledger.adjust_player_goals(b, 1);

        assert_eq!(ledger.goals_to_assign(), 0);
    }

    #[test]
    fn over_assignment_shows_as_negative_gap() {
        let (mut ledger, a, _) = ledger_with_squad();
        ledger.record_event(EventKind::Goal, TeamSide::Home);

        ledger.adjust_player_goals(a, 3);

        assert_eq!(ledger.goals_to_assign(), -2);
    }

    #[test]
    fn scorer_summary_omits_the_multiplier_for_single_goals() {
        let taro = Uuid::new_v4();
        let jin = Uuid::new_v4();
        let squad = vec![member(taro, "Taro", 10), member(jin, "Jin", 11)];
        let mut ledger = MatchLedger::new("My Team".into(), "United FC".into(), squad);

        ledger.adjust_player_goals(taro, 2);
        ledger.adjust_player_goals(jin, 1);

        assert_eq!(ledger.scorer_summary(), "Taro x2, Jin");
    }

    #[test]
    fn scorer_summary_is_empty_without_scorers() {
        let (ledger, _, _) = ledger_with_squad();
        assert_eq!(ledger.scorer_summary(), "");
    }

    #[test]
    fn clock_formats_zero_padded() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(600), "10:00");
    }

    #[test]
    fn clock_only_advances_while_running() {
        let mut ledger = empty_ledger();

        assert_eq!(ledger.tick(), None);

        ledger.set_clock_running(true);
        assert_eq!(ledger.tick(), Some(1));
        assert_eq!(ledger.tick(), Some(2));

        // Pausing keeps the counter.
        ledger.set_clock_running(false);
        assert_eq!(ledger.tick(), None);
        assert_eq!(ledger.elapsed_seconds(), 2);

        ledger.reset_clock();
        assert_eq!(ledger.elapsed_seconds(), 0);
        assert!(!ledger.clock_running());
    }

    #[test]
    fn events_are_stamped_with_the_current_clock() {
        let mut ledger = empty_ledger();
        ledger.set_clock_running(true);
        for _ in 0..65 {
            ledger.tick();
        }

        let event = ledger.record_event(EventKind::Goal, TeamSide::Home).clone();
        assert_eq!(event.timestamp, "01:05");

        // Recording while paused is allowed and uses the frozen clock.
        ledger.set_clock_running(false);
        let paused = ledger.record_event(EventKind::Foul, TeamSide::Away).clone();
        assert_eq!(paused.timestamp, "01:05");
    }

    #[test]
    fn ledger_converts_into_a_match_record_with_scorers_only() {
        let (mut ledger, a, _) = ledger_with_squad();
        ledger.record_event(EventKind::Goal, TeamSide::Home);
        ledger.record_event(EventKind::Goal, TeamSide::Away);
        ledger.adjust_player_goals(a, 1);

        let entity = MatchEntity::from(&ledger);

        assert_eq!(entity.id, ledger.record_id);
        assert_eq!(entity.self_score, 1);
        assert_eq!(entity.opponent_score, 1);
        assert_eq!(entity.scorers.len(), 1);
        assert_eq!(entity.scorers[0].player_id, a);
        assert_eq!(entity.scorers[0].goals, 1);
    }
}
