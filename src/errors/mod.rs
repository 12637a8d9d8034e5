use thiserror::Error;

use crate::domain::{CardId, DeckId};

/// Failures surfaced by the study flow and the storage collaborator.
///
/// An empty deck is not an error, see [`crate::services::study::StudyOutcome`].
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("No deck with ID {0}")]
    DeckNotFound(DeckId),

    #[error("No card with ID {0}")]
    CardNotFound(CardId),

    #[error("Invalid deck settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ReviewResult<T> = Result<T, ReviewError>;
