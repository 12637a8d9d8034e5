use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    cards::{adjust_views, create_card, delete_card, get_card, list_cards, update_card},
    decks::{add_card, create_deck, delete_deck, get_deck, list_decks, remove_card, update_deck},
    study::study_deck,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/decks", get(list_decks).post(create_deck))
        .route(
            "/api/decks/:id",
            get(get_deck).put(update_deck).delete(delete_deck),
        )
        .route("/api/decks/:id/study", post(study_deck))
        .route(
            "/api/decks/:id/cards/:card_id",
            put(add_card).delete(remove_card),
        )
        .route("/api/cards", get(list_cards).post(create_card))
        .route(
            "/api/cards/:id",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route("/api/cards/:id/views", post(adjust_views))
        .with_state(state)
}
