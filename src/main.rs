use anyhow::Result;

use cards::cli::Command;
use cards::{handle_adjust, handle_cards, handle_decks, handle_serve, handle_study, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Study { deck } => handle_study(*deck),
        Command::Adjust { card, delta } => handle_adjust(*card, *delta),
        Command::Decks => handle_decks(),
        Command::Cards { deck, unassigned } => handle_cards(*deck, *unassigned),
    }
}
