pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod scheduler;
pub mod services;
pub mod store;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use colored::Colorize;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::{CardFilter, DbPool};
use crate::domain::{Card, CardId, DeckId};
use crate::services::server::ServerService;
use crate::services::{StudyOutcome, StudyService};
use crate::store::SqliteStore;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_study(deck_id: DeckId) -> Result<()> {
    let service = StudyService::new(SqliteStore::new(open_pool()?));

    match service.pick_next_card(deck_id, &mut rand::thread_rng())? {
        StudyOutcome::Card(card) => print_study_card(&card),
        StudyOutcome::EmptyDeck => println!("{}", "Deck has no cards to study".yellow()),
    }
    Ok(())
}

pub fn handle_adjust(card_id: CardId, delta: i64) -> Result<()> {
    let service = StudyService::new(SqliteStore::new(open_pool()?));
    let adjustment = service.adjust_views(card_id, delta)?;

    let views = adjustment.card.views.to_string();
    if adjustment.clamped {
        println!("Card {}: views {} (clamped)", card_id, views.yellow());
    } else {
        println!("Card {}: views {}", card_id, views.green());
    }
    Ok(())
}

pub fn handle_decks() -> Result<()> {
    let pool = open_pool()?;
    let mut conn = database::get_connection(&pool)?;

    for summary in database::decks::list_summaries(&mut conn)? {
        let deck = &summary.deck;
        println!(
            "{:>4}  {}  {} cards  (date weight {}, view weight {}, view limit {})",
            deck.id,
            deck.name.bold(),
            summary.card_count,
            deck.date_weight,
            deck.view_weight,
            deck.view_limit
        );
    }
    Ok(())
}

pub fn handle_cards(deck_id: Option<DeckId>, unassigned: bool) -> Result<()> {
    let filter = match (deck_id, unassigned) {
        (Some(deck_id), _) => CardFilter::InDeck(deck_id),
        (None, true) => CardFilter::Unassigned,
        (None, false) => CardFilter::All,
    };

    let pool = open_pool()?;
    let mut conn = database::get_connection(&pool)?;

    for card in database::cards::list(&mut conn, filter)? {
        print_card_row(&card);
    }
    Ok(())
}

fn open_pool() -> Result<DbPool> {
    let config = AppConfig::new();
    database::open_database(&config.storage.database_path)
}

fn print_study_card(card: &Card) {
    println!("{} {}", "Card".bold(), card.id);
    println!("  {} {}", "Front:".cyan(), card.front);
    println!("  {} {}", "Back: ".cyan(), card.back);
    println!("  {}", format!("views: {}", card.views).dimmed());
}

fn print_card_row(card: &Card) {
    let last_view = if card.is_unviewed() {
        "never".to_string()
    } else {
        card.last_view.format("%Y-%m-%d %H:%M").to_string()
    };

    println!(
        "{:>4}  {}  /  {}  {}",
        card.id,
        card.front.bold(),
        card.back,
        format!("(views {}, last {})", card.views, last_view).dimmed()
    );
}
