use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use std::sync::Arc;

use super::{AppState, connection, query_error, review_error};
use crate::api::models::{
    DeckDetail, DeckParams, DeckRequest, DeckUpdateRequest, MembershipResponse, checked_name,
};
use crate::database::{self, DeckFilter, DeckSummary};
use crate::domain::{CardId, DeckId};
use crate::errors::ReviewError;

pub async fn list_decks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeckParams>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let summaries = if params.empty.unwrap_or(false) {
        database::decks::list(&mut conn, DeckFilter::Empty).map(|decks| {
            decks
                .into_iter()
                .map(|deck| DeckSummary {
                    deck,
                    card_count: 0,
                })
                .collect::<Vec<_>>()
        })
    } else {
        database::decks::list_summaries(&mut conn)
    };

    match summaries {
        Ok(summaries) => Json(summaries).into_response(),
        Err(e) => query_error(e),
    }
}

pub async fn create_deck(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeckRequest>,
) -> impl IntoResponse {
    let settings = match request.settings(state.config.deck_defaults) {
        Ok(settings) => settings,
        Err(e) => return review_error(e),
    };
    let name = match checked_name(&request.name) {
        Ok(name) => name,
        Err(e) => return review_error(e),
    };

    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match database::decks::insert_deck(&mut conn, &name, &settings) {
        Ok(deck) => {
            info!("Created deck {} ({})", deck.id, deck.name);
            (StatusCode::CREATED, Json(deck)).into_response()
        }
        Err(e) => query_error(e),
    }
}

pub async fn get_deck(
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<DeckId>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let deck = match database::decks::find_by_id(&mut conn, deck_id) {
        Ok(Some(deck)) => deck,
        Ok(None) => return review_error(ReviewError::DeckNotFound(deck_id)),
        Err(e) => return query_error(e),
    };

    match database::cards::list_in_deck(&mut conn, deck_id) {
        Ok(cards) => Json(DeckDetail { deck, cards }).into_response(),
        Err(e) => query_error(e),
    }
}

pub async fn update_deck(
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<DeckId>,
    Json(request): Json<DeckUpdateRequest>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let mut deck = match database::decks::find_by_id(&mut conn, deck_id) {
        Ok(Some(deck)) => deck,
        Ok(None) => return review_error(ReviewError::DeckNotFound(deck_id)),
        Err(e) => return query_error(e),
    };

    if let Err(e) = request.apply(&mut deck) {
        return review_error(e);
    }

    match database::decks::update_deck(&mut conn, &deck) {
        Ok(true) => Json(deck).into_response(),
        Ok(false) => review_error(ReviewError::DeckNotFound(deck_id)),
        Err(e) => query_error(e),
    }
}

pub async fn delete_deck(
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<DeckId>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match database::decks::delete_deck(&mut conn, deck_id) {
        Ok(true) => {
            info!("Deleted deck {}", deck_id);
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => review_error(ReviewError::DeckNotFound(deck_id)),
        Err(e) => query_error(e),
    }
}

pub async fn add_card(
    State(state): State<Arc<AppState>>,
    Path((deck_id, card_id)): Path<(DeckId, CardId)>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match database::decks::find_by_id(&mut conn, deck_id) {
        Ok(Some(_)) => {}
        Ok(None) => return review_error(ReviewError::DeckNotFound(deck_id)),
        Err(e) => return query_error(e),
    }
    match database::cards::find_by_id(&mut conn, card_id) {
        Ok(Some(_)) => {}
        Ok(None) => return review_error(ReviewError::CardNotFound(card_id)),
        Err(e) => return query_error(e),
    }

    match database::membership::add_card_to_deck(&mut conn, card_id, deck_id) {
        Ok(added) => Json(MembershipResponse {
            deck_id,
            card_id,
            added,
        })
        .into_response(),
        Err(e) => query_error(e),
    }
}

pub async fn remove_card(
    State(state): State<Arc<AppState>>,
    Path((deck_id, card_id)): Path<(DeckId, CardId)>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match database::membership::remove_card_from_deck(&mut conn, card_id, deck_id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            format!("Card {} is not in deck {}", card_id, deck_id),
        )
            .into_response(),
        Err(e) => query_error(e),
    }
}
