use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::card::ResultCardData, error::AppError, services::card_service, state::SharedState,
};

/// Route exposing the result-card data snapshot.
pub fn router() -> Router<SharedState> {
    Router::new().route("/match/card", get(result_card))
}

/// Return the data backing the shareable result card for the active match.
/// Rasterization is a client concern; failures here never affect the ledger.
#[utoipa::path(
    get,
    path = "/match/card",
    tag = "match",
    responses(
        (status = 200, description = "Result card data", body = ResultCardData),
        (status = 409, description = "No match in progress")
    )
)]
pub async fn result_card(
    State(state): State<SharedState>,
) -> Result<Json<ResultCardData>, AppError> {
    let card = card_service::result_card(&state).await?;
    Ok(Json(card))
}
