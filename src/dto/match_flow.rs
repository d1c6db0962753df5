use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{common::ScoreboardSnapshot, format_system_time},
    state::ledger::{EventKind, MatchEvent, MatchLedger, SquadMember, TeamSide},
};

/// Side selector accepted from and returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamSideDto {
    /// The managed team.
    Home,
    /// The opponent.
    Away,
}

impl From<TeamSideDto> for TeamSide {
    fn from(value: TeamSideDto) -> Self {
        match value {
            TeamSideDto::Home => TeamSide::Home,
            TeamSideDto::Away => TeamSide::Away,
        }
    }
}

impl From<TeamSide> for TeamSideDto {
    fn from(value: TeamSide) -> Self {
        match value {
            TeamSide::Home => TeamSideDto::Home,
            TeamSide::Away => TeamSideDto::Away,
        }
    }
}

/// Event kind accepted from and returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKindDto {
    /// A goal.
    Goal,
    /// A foul.
    Foul,
    /// A substitution.
    Substitution,
}

impl From<EventKindDto> for EventKind {
    fn from(value: EventKindDto) -> Self {
        match value {
            EventKindDto::Goal => EventKind::Goal,
            EventKindDto::Foul => EventKind::Foul,
            EventKindDto::Substitution => EventKind::Substitution,
        }
    }
}

impl From<EventKind> for EventKindDto {
    fn from(value: EventKind) -> Self {
        match value {
            EventKind::Goal => EventKindDto::Goal,
            EventKind::Foul => EventKindDto::Foul,
            EventKind::Substitution => EventKindDto::Substitution,
        }
    }
}

/// Context returned when match setup begins: everything the setup screen needs.
#[derive(Debug, Serialize, ToSchema)]
pub struct SetupContext {
    /// Managed team name from the profile.
    pub team_name: String,
    /// Opponent name prefilled into the form.
    pub default_opponent: String,
    /// Previously faced opponents, most recent first, deduplicated.
    pub recent_opponents: Vec<String>,
    /// Active roster entries that will be snapshotted at kickoff.
    pub active_players: Vec<SquadMemberSummary>,
}

/// Payload confirming setup and starting live play.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct KickOffRequest {
    /// Opponent display name; blank or missing falls back to the default.
    #[serde(default)]
    #[validate(length(max = 40))]
    pub opponent_name: Option<String>,
}

/// Payload recording a quick-entry event from the live screen.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordEventRequest {
    /// What happened.
    pub kind: EventKindDto,
    /// Which side it happened for.
    pub side: TeamSideDto,
}

/// Payload applying a free-form score correction during review.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdjustScoreRequest {
    /// Which score cell to adjust.
    pub side: TeamSideDto,
    /// Signed correction; the result is clamped at zero.
    #[validate(range(min = -99, max = 99))]
    pub delta: i32,
}

/// Payload attributing goals to a squad member during review.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdjustPlayerGoalsRequest {
    /// Signed attribution change; the result is clamped at zero.
    #[validate(range(min = -99, max = 99))]
    pub delta: i32,
}

/// Payload renaming the opponent mid-match.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct OpponentNameRequest {
    /// New opponent name; blank input keeps the current name.
    #[validate(length(max = 40))]
    pub name: String,
}

/// Payload attaching a match photo during review.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MatchPhotoRequest {
    /// Photo as a data URL.
    pub photo: String,
}

/// Projection of a recorded event for REST/SSE clients.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct EventSummary {
    /// Ledger-unique event identifier.
    pub id: u64,
    /// What happened.
    pub kind: EventKindDto,
    /// Which side it happened for.
    pub side: TeamSideDto,
    /// Elapsed clock at recording time, `mm:ss`.
    pub timestamp: String,
    /// Roster reference when the player is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Uuid>,
}

impl From<&MatchEvent> for EventSummary {
    fn from(event: &MatchEvent) -> Self {
        Self {
            id: event.id,
            kind: event.kind.into(),
            side: event.side.into(),
            timestamp: event.timestamp.clone(),
            player_id: event.player_id,
        }
    }
}

/// Projection of a squad member with per-match attribution.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct SquadMemberSummary {
    /// Roster identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Shirt number.
    pub number: u8,
    /// Goals attributed for this match.
    pub goals: u32,
    /// Career total at snapshot time.
    pub career_goals: u32,
}

impl From<&SquadMember> for SquadMemberSummary {
    fn from(member: &SquadMember) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            number: member.number,
            goals: member.goals,
            career_goals: member.career_goals,
        }
    }
}

/// Full projection of the active ledger returned by the match endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct LedgerSummary {
    /// Identifier the persisted match record will carry.
    pub record_id: Uuid,
    /// Scores, fouls, and clock.
    pub scoreboard: ScoreboardSnapshot,
    /// Event log, most recent first.
    pub events: Vec<EventSummary>,
    /// Squad snapshot with per-match attribution.
    pub squad: Vec<SquadMemberSummary>,
    /// Advisory reconciliation gap (zero = fully attributed).
    pub goals_to_assign: i64,
    /// Wall-clock moment the ledger was created, RFC3339.
    pub started_at: String,
}

impl From<&MatchLedger> for LedgerSummary {
    fn from(ledger: &MatchLedger) -> Self {
        Self {
            record_id: ledger.record_id,
            scoreboard: ledger.into(),
            events: ledger.events().iter().map(Into::into).collect(),
            squad: ledger.squad().values().map(Into::into).collect(),
            goals_to_assign: ledger.goals_to_assign(),
            started_at: format_system_time(ledger.started_at),
        }
    }
}

/// Response to a goal-attribution change during review.
#[derive(Debug, Serialize, ToSchema)]
pub struct GoalAttributionResponse {
    /// The squad member after the change.
    pub player: SquadMemberSummary,
    /// Advisory reconciliation gap after the change.
    pub goals_to_assign: i64,
}

/// Summary returned once a match has been finalized and persisted.
#[derive(Debug, Serialize, ToSchema)]
pub struct FinalizeSummary {
    /// Identifier of the persisted match record.
    pub match_id: Uuid,
    /// Opponent display name.
    pub opponent_name: String,
    /// Final managed-team score.
    pub home_score: u32,
    /// Final opponent score.
    pub away_score: u32,
    /// Players credited with goals.
    pub scorers: Vec<ScorerLine>,
}

/// One line of goal attribution in a finalize summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScorerLine {
    /// Roster identifier.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
    /// Goals credited.
    pub goals: u32,
}
