use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use std::sync::Arc;

use super::{AppState, connection, query_error, review_error};
use crate::api::models::{
    AdjustViewsRequest, AdjustViewsResponse, CardDetail, CardParams, CardRequest,
    CardUpdateRequest,
};
use crate::database::{self, CardFilter, DeckFilter};
use crate::domain::CardId;
use crate::errors::ReviewError;

pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CardParams>,
) -> impl IntoResponse {
    let filter = match (params.deck, params.unassigned.unwrap_or(false)) {
        (Some(_), true) => {
            return (
                StatusCode::BAD_REQUEST,
                "deck and unassigned cannot be combined",
            )
                .into_response();
        }
        (Some(deck_id), false) => CardFilter::InDeck(deck_id),
        (None, true) => CardFilter::Unassigned,
        (None, false) => CardFilter::All,
    };

    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    if let CardFilter::InDeck(deck_id) = filter {
        match database::decks::find_by_id(&mut conn, deck_id) {
            Ok(Some(_)) => {}
            Ok(None) => return review_error(ReviewError::DeckNotFound(deck_id)),
            Err(e) => return query_error(e),
        }
    }

    match database::cards::list(&mut conn, filter) {
        Ok(cards) => Json(cards).into_response(),
        Err(e) => query_error(e),
    }
}

pub async fn create_card(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CardRequest>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    if let Some(deck_id) = request.deck {
        match database::decks::find_by_id(&mut conn, deck_id) {
            Ok(Some(_)) => {}
            Ok(None) => return review_error(ReviewError::DeckNotFound(deck_id)),
            Err(e) => return query_error(e),
        }
    }

    let front = request.front.as_deref().unwrap_or(&state.config.card.front);
    let back = request.back.as_deref().unwrap_or(&state.config.card.back);

    let inserted = match request.deck {
        Some(deck_id) => database::cards::insert_card_in_deck(&mut conn, front, back, deck_id),
        None => database::cards::insert_card(&mut conn, front, back),
    };
    let card = match inserted {
        Ok(card) => card,
        Err(e) => return query_error(e),
    };

    info!("Created card {}", card.id);
    (StatusCode::CREATED, Json(card)).into_response()
}

pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<CardId>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let card = match database::cards::find_by_id(&mut conn, card_id) {
        Ok(Some(card)) => card,
        Ok(None) => return review_error(ReviewError::CardNotFound(card_id)),
        Err(e) => return query_error(e),
    };

    match database::decks::list(&mut conn, DeckFilter::Containing(card_id)) {
        Ok(decks) => Json(CardDetail { card, decks }).into_response(),
        Err(e) => query_error(e),
    }
}

pub async fn update_card(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<CardId>,
    Json(request): Json<CardUpdateRequest>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match database::cards::modify_card(&mut conn, card_id, |card| request.apply(card)) {
        Ok(Some(card)) => Json(card).into_response(),
        Ok(None) => review_error(ReviewError::CardNotFound(card_id)),
        Err(e) => query_error(e),
    }
}

pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<CardId>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match database::cards::delete_card(&mut conn, card_id) {
        Ok(true) => {
            info!("Deleted card {}", card_id);
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => review_error(ReviewError::CardNotFound(card_id)),
        Err(e) => query_error(e),
    }
}

pub async fn adjust_views(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<CardId>,
    Json(request): Json<AdjustViewsRequest>,
) -> impl IntoResponse {
    match state.study.adjust_views(card_id, request.delta) {
        Ok(adjustment) => Json(AdjustViewsResponse {
            card: adjustment.card,
            clamped: adjustment.clamped,
        })
        .into_response(),
        Err(e) => review_error(e),
    }
}
