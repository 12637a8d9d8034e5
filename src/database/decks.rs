use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::{DeckFilter, DeckSummary};
use crate::domain::{CardId, DeckConfig, DeckId, DeckSettings};

const DECK_COLUMNS: &str = "deck_id, name, date_weight, view_weight, view_limit";
// Same columns for queries joining deck_card, where deck_id is ambiguous
const JOINED_DECK_COLUMNS: &str =
    "deck.deck_id, deck.name, deck.date_weight, deck.view_weight, deck.view_limit";

pub fn insert_deck(conn: &mut DbConn, name: &str, settings: &DeckSettings) -> Result<DeckConfig> {
    let sql = format!(
        "INSERT INTO deck (name, date_weight, view_weight, view_limit) VALUES (?1, ?2, ?3, ?4) RETURNING {DECK_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![name, settings.date_weight, settings.view_weight, settings.view_limit],
        parse_deck_row,
    )
    .context("Failed to insert deck")
}

fn parse_deck_row(row: &rusqlite::Row) -> rusqlite::Result<DeckConfig> {
    Ok(DeckConfig {
        id: row.get(0)?,
        name: row.get(1)?,
        date_weight: row.get(2)?,
        view_weight: row.get(3)?,
        view_limit: row.get(4)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: DeckId) -> Result<Option<DeckConfig>> {
    let sql = format!("SELECT {DECK_COLUMNS} FROM deck WHERE deck_id = ?1");

    conn.query_row(&sql, params![id], parse_deck_row)
        .optional()
        .context("Failed to query deck by id")
}

/// Writes name and coefficients back; returns false if the deck does not exist
pub fn update_deck(conn: &mut DbConn, deck: &DeckConfig) -> Result<bool> {
    let sql = "UPDATE deck SET name = ?1, date_weight = ?2, view_weight = ?3, view_limit = ?4 WHERE deck_id = ?5";

    let changed = conn
        .execute(
            sql,
            params![deck.name, deck.date_weight, deck.view_weight, deck.view_limit, deck.id],
        )
        .context("Failed to update deck")?;

    Ok(changed > 0)
}

/// Deletes the deck and its memberships together; the cards themselves stay
pub fn delete_deck(conn: &mut DbConn, id: DeckId) -> Result<bool> {
    let tx = conn.transaction().context("Failed to begin deck deletion")?;

    tx.execute("DELETE FROM deck_card WHERE deck_id = ?1", params![id])
        .context("Failed to delete deck memberships")?;
    let deleted = tx
        .execute("DELETE FROM deck WHERE deck_id = ?1", params![id])
        .context("Failed to delete deck")?;

    tx.commit().context("Failed to commit deck deletion")?;
    Ok(deleted > 0)
}

pub fn list(conn: &mut DbConn, filter: DeckFilter) -> Result<Vec<DeckConfig>> {
    match filter {
        DeckFilter::All => list_all(conn),
        DeckFilter::Empty => list_empty(conn),
        DeckFilter::Containing(card_id) => list_containing(conn, card_id),
    }
}

fn list_all(conn: &mut DbConn) -> Result<Vec<DeckConfig>> {
    let sql = format!("SELECT {DECK_COLUMNS} FROM deck ORDER BY name, deck_id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_deck_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn list_empty(conn: &mut DbConn) -> Result<Vec<DeckConfig>> {
    let sql = format!(
        "SELECT {DECK_COLUMNS} FROM deck WHERE deck_id NOT IN (SELECT DISTINCT deck_id FROM deck_card) ORDER BY name, deck_id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_deck_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn list_containing(conn: &mut DbConn, card_id: CardId) -> Result<Vec<DeckConfig>> {
    let sql = format!(
        "SELECT {JOINED_DECK_COLUMNS} FROM deck JOIN deck_card ON deck_card.deck_id = deck.deck_id WHERE deck_card.card_id = ?1 ORDER BY deck.name, deck.deck_id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![card_id], parse_deck_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// All decks sorted by name, each with the number of cards it holds
pub fn list_summaries(conn: &mut DbConn) -> Result<Vec<DeckSummary>> {
    let sql = format!(
        "SELECT {JOINED_DECK_COLUMNS}, COUNT(deck_card.card_id) FROM deck LEFT JOIN deck_card ON deck_card.deck_id = deck.deck_id GROUP BY deck.deck_id ORDER BY deck.name, deck.deck_id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            let card_count: i64 = row.get(5)?;
            Ok(DeckSummary {
                deck: parse_deck_row(row)?,
                card_count: card_count as usize,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_cards(conn: &mut DbConn, id: DeckId) -> Result<usize> {
    let sql = "SELECT COUNT(*) FROM deck_card WHERE deck_id = ?1";
    let count: i64 = conn
        .query_row(sql, params![id], |row| row.get(0))
        .context("Failed to count cards in deck")?;

    Ok(count as usize)
}
