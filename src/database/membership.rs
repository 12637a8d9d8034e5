use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::{CardId, DeckId};

/// Puts a card into a deck. Returns false when it was already a member.
pub fn add_card_to_deck(conn: &mut DbConn, card_id: CardId, deck_id: DeckId) -> Result<bool> {
    let sql = "INSERT OR IGNORE INTO deck_card (deck_id, card_id) VALUES (?1, ?2)";

    let inserted = conn
        .execute(sql, params![deck_id, card_id])
        .with_context(|| format!("Failed to add card {} to deck {}", card_id, deck_id))?;

    Ok(inserted > 0)
}

/// Takes a card out of a deck. Returns false when it was not a member.
pub fn remove_card_from_deck(conn: &mut DbConn, card_id: CardId, deck_id: DeckId) -> Result<bool> {
    let sql = "DELETE FROM deck_card WHERE deck_id = ?1 AND card_id = ?2";

    let removed = conn
        .execute(sql, params![deck_id, card_id])
        .with_context(|| format!("Failed to remove card {} from deck {}", card_id, deck_id))?;

    Ok(removed > 0)
}
