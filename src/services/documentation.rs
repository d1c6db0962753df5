use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Futsal Board Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::match_flow::current_match,
        crate::routes::match_flow::current_phase,
        crate::routes::match_flow::begin_setup,
        crate::routes::match_flow::kick_off,
        crate::routes::match_flow::record_event,
        crate::routes::match_flow::undo_last_event,
        crate::routes::match_flow::start_clock,
        crate::routes::match_flow::pause_clock,
        crate::routes::match_flow::reset_clock,
        crate::routes::match_flow::rename_opponent,
        crate::routes::match_flow::attach_photo,
        crate::routes::match_flow::open_review,
        crate::routes::match_flow::resume_live,
        crate::routes::match_flow::adjust_score,
        crate::routes::match_flow::adjust_player_goals,
        crate::routes::match_flow::finalize,
        crate::routes::match_flow::abandon,
        crate::routes::roster::list_players,
        crate::routes::roster::create_player,
        crate::routes::roster::update_player,
        crate::routes::roster::toggle_active,
        crate::routes::roster::delete_player,
        crate::routes::roster::leaderboard,
        crate::routes::team::profile,
        crate::routes::team::update_profile,
        crate::routes::history::list_matches,
        crate::routes::history::delete_match,
        crate::routes::card::result_card,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::Handshake,
            crate::dto::phase::VisibleMatchPhase,
            crate::dto::common::ScoreboardSnapshot,
            crate::dto::common::MatchPhaseSnapshot,
            crate::dto::match_flow::TeamSideDto,
            crate::dto::match_flow::EventKindDto,
            crate::dto::match_flow::SetupContext,
            crate::dto::match_flow::KickOffRequest,
            crate::dto::match_flow::RecordEventRequest,
            crate::dto::match_flow::AdjustScoreRequest,
            crate::dto::match_flow::AdjustPlayerGoalsRequest,
            crate::dto::match_flow::OpponentNameRequest,
            crate::dto::match_flow::MatchPhotoRequest,
            crate::dto::match_flow::EventSummary,
            crate::dto::match_flow::SquadMemberSummary,
            crate::dto::match_flow::LedgerSummary,
            crate::dto::match_flow::GoalAttributionResponse,
            crate::dto::match_flow::FinalizeSummary,
            crate::dto::match_flow::ScorerLine,
            crate::dto::roster::CreatePlayerRequest,
            crate::dto::roster::UpdatePlayerRequest,
            crate::dto::roster::PlayerSummary,
            crate::dto::team::TeamProfileResponse,
            crate::dto::team::UpdateTeamProfileRequest,
            crate::dto::history::MatchSummary,
            crate::dto::card::ResultCardData,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "match", description = "Match flow: setup, live play, review, finalize"),
        (name = "roster", description = "Roster management"),
        (name = "team", description = "Team profile"),
        (name = "history", description = "Saved match history"),
    )
)]
pub struct ApiDoc;
