use chrono::{DateTime, Utc};
use log::debug;
use rand::Rng;

use super::review::mark_viewed;
use super::selection::select_weighted;
use super::weighting::weigh_cards;
use crate::domain::{Card, DeckConfig};

/// Chooses the next card to study and returns it already marked as viewed.
///
/// `None` means the deck has no members. Persisting the returned state is up
/// to the caller.
pub fn pick_next_card<R>(
    deck: &DeckConfig,
    members: &[Card],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<Card>
where
    R: Rng + ?Sized,
{
    let weighted = weigh_cards(deck, members, now);
    let chosen = select_weighted(&weighted, rng)?;

    debug!(
        "Deck {}: drew card {} out of {} members",
        deck.id,
        chosen.id,
        members.len()
    );

    Some(mark_viewed(chosen, now))
}
