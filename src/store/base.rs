//! Storage interface consumed by the study flow.
//!
//! A [`ReviewSession`] spans one read-snapshot-and-write-back sequence. The
//! store guarantees that sessions touching the same cards are serialized, and
//! a session dropped without [`ReviewSession::commit`] leaves storage unchanged.

use crate::domain::{Card, CardId, DeckConfig, DeckId};
use crate::errors::ReviewResult;

pub trait CardStore: Send + Sync {
    type Session<'a>: ReviewSession
    where
        Self: 'a;

    /// Opens a session that holds the store's write lock until it ends
    fn begin(&self) -> ReviewResult<Self::Session<'_>>;
}

pub trait ReviewSession {
    /// Fails with `DeckNotFound` when the deck does not exist
    fn fetch_deck_config(&mut self, deck_id: DeckId) -> ReviewResult<DeckConfig>;

    /// Current state of every member card; an empty deck yields an empty vector
    fn fetch_members(&mut self, deck_id: DeckId) -> ReviewResult<Vec<Card>>;

    fn fetch_card(&mut self, card_id: CardId) -> ReviewResult<Card>;

    /// Stores the card's views and last view time
    fn persist_card_state(&mut self, card: &Card) -> ReviewResult<()>;

    fn commit(self) -> ReviewResult<()>;
}
