use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, TransactionBehavior, params};

use super::connection::DbConn;
use super::models::CardFilter;
use crate::domain::{Card, CardId, DeckId};

const CARD_COLUMNS: &str = "card_id, front, back, views, last_view";
const JOINED_CARD_COLUMNS: &str =
    "card.card_id, card.front, card.back, card.views, card.last_view";

/// Inserts a card with the given text; views and last view take the schema defaults
pub fn insert_card(conn: &mut DbConn, front: &str, back: &str) -> Result<Card> {
    let sql = format!("INSERT INTO card (front, back) VALUES (?1, ?2) RETURNING {CARD_COLUMNS}");

    conn.query_row(&sql, params![front, back], parse_card_row)
        .context("Failed to insert card")
}

/// Inserts a card and adds it to a deck; nothing is stored if either insert fails
pub fn insert_card_in_deck(
    conn: &mut DbConn,
    front: &str,
    back: &str,
    deck_id: DeckId,
) -> Result<Card> {
    let tx = conn.transaction().context("Failed to begin card insertion")?;
    let sql = format!("INSERT INTO card (front, back) VALUES (?1, ?2) RETURNING {CARD_COLUMNS}");

    let card = tx
        .query_row(&sql, params![front, back], parse_card_row)
        .context("Failed to insert card")?;
    tx.execute(
        "INSERT INTO deck_card (deck_id, card_id) VALUES (?1, ?2)",
        params![deck_id, card.id],
    )
    .with_context(|| format!("Failed to add card to deck {}", deck_id))?;

    tx.commit().context("Failed to commit card insertion")?;
    Ok(card)
}

fn parse_card_row(row: &rusqlite::Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        front: row.get(1)?,
        back: row.get(2)?,
        views: row.get(3)?,
        last_view: row.get(4)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: CardId) -> Result<Option<Card>> {
    let sql = format!("SELECT {CARD_COLUMNS} FROM card WHERE card_id = ?1");

    conn.query_row(&sql, params![id], parse_card_row)
        .optional()
        .context("Failed to query card by id")
}

/// Writes every field of the card back; returns false if the card does not exist
pub fn update_card(conn: &mut DbConn, card: &Card) -> Result<bool> {
    let sql = "UPDATE card SET front = ?1, back = ?2, views = ?3, last_view = ?4 WHERE card_id = ?5";

    let changed = conn
        .execute(
            sql,
            params![card.front, card.back, card.views, card.last_view, card.id],
        )
        .context("Failed to update card")?;

    Ok(changed > 0)
}

/// Reads the card, applies `edit` and writes it back under the database write
/// lock, so a concurrent review cannot slip in between. `None` if the card does not exist.
pub fn modify_card<F>(conn: &mut DbConn, id: CardId, edit: F) -> Result<Option<Card>>
where
    F: FnOnce(&mut Card),
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("Failed to begin card update")?;
    let sql = format!("SELECT {CARD_COLUMNS} FROM card WHERE card_id = ?1");

    let Some(mut card) = tx
        .query_row(&sql, params![id], parse_card_row)
        .optional()
        .context("Failed to query card by id")?
    else {
        return Ok(None);
    };

    edit(&mut card);
    tx.execute(
        "UPDATE card SET front = ?1, back = ?2, views = ?3, last_view = ?4 WHERE card_id = ?5",
        params![card.front, card.back, card.views, card.last_view, card.id],
    )
    .context("Failed to update card")?;

    tx.commit().context("Failed to commit card update")?;
    Ok(Some(card))
}

/// Writes only the review history (views and last view time)
pub fn update_review_state(conn: &mut DbConn, card: &Card) -> Result<bool> {
    let sql = "UPDATE card SET views = ?1, last_view = ?2 WHERE card_id = ?3";

    let changed = conn
        .execute(sql, params![card.views, card.last_view, card.id])
        .with_context(|| format!("Failed to persist review state of card {}", card.id))?;

    Ok(changed > 0)
}

/// Deletes the card and removes it from every deck
pub fn delete_card(conn: &mut DbConn, id: CardId) -> Result<bool> {
    let tx = conn.transaction().context("Failed to begin card deletion")?;

    tx.execute("DELETE FROM deck_card WHERE card_id = ?1", params![id])
        .context("Failed to delete card memberships")?;
    let deleted = tx
        .execute("DELETE FROM card WHERE card_id = ?1", params![id])
        .context("Failed to delete card")?;

    tx.commit().context("Failed to commit card deletion")?;
    Ok(deleted > 0)
}

pub fn list(conn: &mut DbConn, filter: CardFilter) -> Result<Vec<Card>> {
    match filter {
        CardFilter::All => list_all(conn),
        CardFilter::Unassigned => list_unassigned(conn),
        CardFilter::InDeck(deck_id) => list_in_deck(conn, deck_id),
    }
}

fn list_all(conn: &mut DbConn) -> Result<Vec<Card>> {
    let sql = format!("SELECT {CARD_COLUMNS} FROM card ORDER BY card_id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_card_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn list_unassigned(conn: &mut DbConn) -> Result<Vec<Card>> {
    let sql = format!(
        "SELECT {CARD_COLUMNS} FROM card WHERE card_id NOT IN (SELECT DISTINCT card_id FROM deck_card) ORDER BY card_id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_card_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Members of a deck in card id order, which is also the draw scan order
pub fn list_in_deck(conn: &mut DbConn, deck_id: DeckId) -> Result<Vec<Card>> {
    let sql = format!(
        "SELECT {JOINED_CARD_COLUMNS} FROM card JOIN deck_card ON deck_card.card_id = card.card_id WHERE deck_card.deck_id = ?1 ORDER BY card.card_id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![deck_id], parse_card_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to load cards of deck {}", deck_id))?;

    Ok(rows)
}
