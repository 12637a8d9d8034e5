//! In-memory store, mainly for exercising the study flow without SQLite.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;

use super::base::{CardStore, ReviewSession};
use crate::domain::{Card, CardId, DeckConfig, DeckId};
use crate::errors::{ReviewError, ReviewResult};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    decks: BTreeMap<DeckId, DeckConfig>,
    cards: BTreeMap<CardId, Card>,
    memberships: BTreeSet<(DeckId, CardId)>,
}

/// Mutex-guarded maps; a session owns the lock for its whole lifetime
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_persist: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_deck(&self, deck: DeckConfig) {
        self.lock().decks.insert(deck.id, deck);
    }

    pub fn insert_card(&self, card: Card) {
        self.lock().cards.insert(card.id, card);
    }

    pub fn add_member(&self, deck_id: DeckId, card_id: CardId) {
        self.lock().memberships.insert((deck_id, card_id));
    }

    pub fn card(&self, card_id: CardId) -> Option<Card> {
        self.lock().cards.get(&card_id).cloned()
    }

    /// Makes every following `persist_card_state` call fail
    pub fn fail_persist(&self, fail: bool) {
        self.fail_persist.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CardStore for MemoryStore {
    type Session<'a>
        = MemorySession<'a>
    where
        Self: 'a;

    fn begin(&self) -> ReviewResult<MemorySession<'_>> {
        Ok(MemorySession {
            state: self.lock(),
            staged: BTreeMap::new(),
            fail_persist: self.fail_persist.load(Ordering::SeqCst),
        })
    }
}

/// Writes are staged and only reach the shared state on commit
pub struct MemorySession<'a> {
    state: MutexGuard<'a, MemoryState>,
    staged: BTreeMap<CardId, Card>,
    fail_persist: bool,
}

impl MemorySession<'_> {
    fn current(&self, card_id: CardId) -> Option<&Card> {
        self.staged
            .get(&card_id)
            .or_else(|| self.state.cards.get(&card_id))
    }
}

impl ReviewSession for MemorySession<'_> {
    fn fetch_deck_config(&mut self, deck_id: DeckId) -> ReviewResult<DeckConfig> {
        self.state
            .decks
            .get(&deck_id)
            .cloned()
            .ok_or(ReviewError::DeckNotFound(deck_id))
    }

    fn fetch_members(&mut self, deck_id: DeckId) -> ReviewResult<Vec<Card>> {
        let members = self
            .state
            .memberships
            .range((deck_id, CardId::MIN)..=(deck_id, CardId::MAX))
            .filter_map(|&(_, card_id)| self.current(card_id).cloned())
            .collect();

        Ok(members)
    }

    fn fetch_card(&mut self, card_id: CardId) -> ReviewResult<Card> {
        self.current(card_id)
            .cloned()
            .ok_or(ReviewError::CardNotFound(card_id))
    }

    fn persist_card_state(&mut self, card: &Card) -> ReviewResult<()> {
        if self.fail_persist {
            return Err(ReviewError::Storage(anyhow!(
                "Failed to persist review state of card {}",
                card.id
            )));
        }

        let mut updated = self.fetch_card(card.id)?;
        updated.views = card.views;
        updated.last_view = card.last_view;
        self.staged.insert(card.id, updated);
        Ok(())
    }

    fn commit(mut self) -> ReviewResult<()> {
        let staged = std::mem::take(&mut self.staged);
        self.state.cards.extend(staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::never_viewed;

    fn store_with_card() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_deck(DeckConfig {
            id: 1,
            name: "Deck".to_string(),
            date_weight: 1.0,
            view_weight: 1.0,
            view_limit: 1,
        });
        store.insert_card(Card {
            id: 10,
            front: "Front".to_string(),
            back: "Back".to_string(),
            views: 0,
            last_view: never_viewed(),
        });
        store.add_member(1, 10);
        store
    }

    #[test]
    fn test_uncommitted_writes_are_discarded() {
        let store = store_with_card();
        {
            let mut session = store.begin().unwrap();
            let mut card = session.fetch_card(10).unwrap();
            card.views = 9;
            session.persist_card_state(&card).unwrap();
            // Visible inside the session
            assert_eq!(session.fetch_card(10).unwrap().views, 9);
        }

        assert_eq!(store.card(10).unwrap().views, 0);
    }

    #[test]
    fn test_commit_publishes_writes() {
        let store = store_with_card();
        let mut session = store.begin().unwrap();
        let mut card = session.fetch_card(10).unwrap();
        card.views = 3;
        card.front = "ignored".to_string();
        session.persist_card_state(&card).unwrap();
        session.commit().unwrap();

        let stored = store.card(10).unwrap();
        assert_eq!(stored.views, 3);
        // Only the review history is persisted
        assert_eq!(stored.front, "Front");
    }

    #[test]
    fn test_members_are_scoped_to_deck() {
        let store = store_with_card();
        store.insert_card(Card {
            id: 11,
            front: "Other".to_string(),
            back: String::new(),
            views: 0,
            last_view: never_viewed(),
        });
        store.add_member(2, 11);

        let mut session = store.begin().unwrap();
        let members = session.fetch_members(1).unwrap();

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, 10);
        assert!(session.fetch_members(3).unwrap().is_empty());
    }

    #[test]
    fn test_missing_rows_are_reported() {
        let store = store_with_card();
        let mut session = store.begin().unwrap();

        assert!(matches!(
            session.fetch_deck_config(99),
            Err(ReviewError::DeckNotFound(99))
        ));
        assert!(matches!(
            session.fetch_card(99),
            Err(ReviewError::CardNotFound(99))
        ));
    }
}
