use chrono::{DateTime, Utc};

use super::time::elapsed_hours;
use crate::domain::{Card, DeckConfig};

/// Draw weight of a card within a deck:
/// `elapsed_hours * date_weight + max(0, view_limit - views) * view_weight`,
/// saturating at `f64::MAX` for very large coefficients.
pub fn compute_weight(deck: &DeckConfig, card: &Card, now: DateTime<Utc>) -> f64 {
    let recency = recency_credit(deck, card, now);
    let deficit = deficit_credit(deck, card);
    (recency + deficit).min(f64::MAX)
}

fn recency_credit(deck: &DeckConfig, card: &Card, now: DateTime<Utc>) -> f64 {
    let hours = elapsed_hours(card.last_view, now);
    hours as f64 * deck.date_weight
}

fn deficit_credit(deck: &DeckConfig, card: &Card) -> f64 {
    let deficit = view_deficit(deck.view_limit, card.views);
    f64::from(deficit) * deck.view_weight
}

/// Reviews still missing before a card reaches the deck's view limit
pub fn view_deficit(view_limit: u32, views: u32) -> u32 {
    view_limit.saturating_sub(views)
}

/// Pairs every card with its draw weight, keeping input order
pub fn weigh_cards<'a>(
    deck: &DeckConfig,
    cards: &'a [Card],
    now: DateTime<Utc>,
) -> Vec<(&'a Card, f64)> {
    cards
        .iter()
        .map(|card| (card, compute_weight(deck, card, now)))
        .collect()
}
