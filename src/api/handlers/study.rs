use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, review_error};
use crate::api::models::StudyResponse;
use crate::domain::DeckId;
use crate::services::StudyOutcome;

/// Draws the next card of a deck and records the view. An empty deck answers 204.
pub async fn study_deck(
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<DeckId>,
) -> impl IntoResponse {
    let outcome = state.study.pick_next_card(deck_id, &mut rand::thread_rng());

    match outcome {
        Ok(StudyOutcome::Card(card)) => Json(StudyResponse { deck_id, card }).into_response(),
        Ok(StudyOutcome::EmptyDeck) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => review_error(e),
    }
}
