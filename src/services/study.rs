use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::Rng;

use crate::domain::{Card, CardId, DeckId};
use crate::errors::ReviewResult;
use crate::scheduler::{self, Adjustment};
use crate::store::{CardStore, ReviewSession};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudyOutcome {
    /// The drawn card with its review history already advanced
    Card(Card),
    EmptyDeck,
}

/// Runs the study flow against a store. Each call is a single store session,
/// so either the whole read-pick-write sequence lands or none of it does.
pub struct StudyService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: CardStore> StudyService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CardStore, C: Clock> StudyService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pick_next_card<R>(&self, deck_id: DeckId, rng: &mut R) -> ReviewResult<StudyOutcome>
    where
        R: Rng + ?Sized,
    {
        let mut session = self.store.begin()?;
        let deck = session.fetch_deck_config(deck_id)?;
        let members = session.fetch_members(deck_id)?;
        let now = self.clock.now();

        let Some(card) = scheduler::pick_next_card(&deck, &members, now, rng) else {
            session.commit()?;
            info!("Deck {} has no cards to study", deck_id);
            return Ok(StudyOutcome::EmptyDeck);
        };

        session.persist_card_state(&card)?;
        session.commit()?;

        info!(
            "Deck {}: presenting card {} (views: {})",
            deck_id, card.id, card.views
        );
        Ok(StudyOutcome::Card(card))
    }

    /// Manual view count correction; `last_view` stays as it was
    pub fn adjust_views(&self, card_id: CardId, delta: i64) -> ReviewResult<Adjustment> {
        let mut session = self.store.begin()?;
        let card = session.fetch_card(card_id)?;
        let adjustment = scheduler::adjust_views(&card, delta);

        session.persist_card_state(&adjustment.card)?;
        session.commit()?;

        if adjustment.clamped {
            warn!(
                "Card {}: adjusting {} views by {} is out of range, clamped to {}",
                card_id, card.views, delta, adjustment.card.views
            );
        }
        Ok(adjustment)
    }
}
