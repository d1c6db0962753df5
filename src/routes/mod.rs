use axum::Router;

use crate::state::SharedState;

pub mod card;
pub mod docs;
pub mod health;
pub mod history;
pub mod match_flow;
pub mod roster;
pub mod sse;
pub mod team;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(match_flow::router())
        .merge(roster::router())
        .merge(team::router())
        .merge(history::router())
        .merge(card::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
