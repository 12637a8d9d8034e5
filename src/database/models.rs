use serde::Serialize;

use crate::domain::{CardId, DeckConfig, DeckId};

/// Which decks a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckFilter {
    All,
    /// Decks that hold no cards at all
    Empty,
    Containing(CardId),
}

/// Which cards a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFilter {
    All,
    /// Cards that belong to no deck
    Unassigned,
    InDeck(DeckId),
}

// DTO for the deck overview query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    #[serde(flatten)]
    pub deck: DeckConfig,
    pub card_count: usize,
}
