use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;

use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, DbPool};
use crate::errors::ReviewError;
use crate::services::StudyService;
use crate::store::SqliteStore;

pub mod cards;
pub mod decks;
pub mod study;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub study: StudyService<SqliteStore>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let study = StudyService::new(SqliteStore::new(pool.clone()));
        Self {
            pool,
            config,
            study,
        }
    }
}

fn connection(state: &AppState) -> Result<DbConn, Response> {
    database::get_connection(&state.pool).map_err(|e| {
        error!("{:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response()
    })
}

fn query_error(e: anyhow::Error) -> Response {
    error!("{:?}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response()
}

fn review_error(e: ReviewError) -> Response {
    match e {
        ReviewError::DeckNotFound(_) | ReviewError::CardNotFound(_) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        ReviewError::InvalidSettings(_) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        ReviewError::Storage(e) => query_error(e),
    }
}
