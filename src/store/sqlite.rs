use anyhow::Context;
use log::warn;

use super::base::{CardStore, ReviewSession};
use crate::database::{self, DbConn, DbPool};
use crate::domain::{Card, CardId, DeckConfig, DeckId};
use crate::errors::{ReviewError, ReviewResult};

/// SQLite-backed store; every session is an `IMMEDIATE` transaction, so the
/// write lock is held from the first read until commit or rollback
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl CardStore for SqliteStore {
    type Session<'a>
        = SqliteSession
    where
        Self: 'a;

    fn begin(&self) -> ReviewResult<SqliteSession> {
        let conn = database::get_connection(&self.pool)?;
        conn.execute_batch("BEGIN IMMEDIATE")
            .context("Failed to begin review transaction")?;

        Ok(SqliteSession {
            conn,
            finished: false,
        })
    }
}

pub struct SqliteSession {
    conn: DbConn,
    finished: bool,
}

impl ReviewSession for SqliteSession {
    fn fetch_deck_config(&mut self, deck_id: DeckId) -> ReviewResult<DeckConfig> {
        database::decks::find_by_id(&mut self.conn, deck_id)?
            .ok_or(ReviewError::DeckNotFound(deck_id))
    }

    fn fetch_members(&mut self, deck_id: DeckId) -> ReviewResult<Vec<Card>> {
        Ok(database::cards::list_in_deck(&mut self.conn, deck_id)?)
    }

    fn fetch_card(&mut self, card_id: CardId) -> ReviewResult<Card> {
        database::cards::find_by_id(&mut self.conn, card_id)?
            .ok_or(ReviewError::CardNotFound(card_id))
    }

    fn persist_card_state(&mut self, card: &Card) -> ReviewResult<()> {
        if database::cards::update_review_state(&mut self.conn, card)? {
            Ok(())
        } else {
            Err(ReviewError::CardNotFound(card.id))
        }
    }

    fn commit(mut self) -> ReviewResult<()> {
        self.conn
            .execute_batch("COMMIT")
            .context("Failed to commit review transaction")?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!("Failed to roll back review transaction: {}", e);
        }
    }
}
