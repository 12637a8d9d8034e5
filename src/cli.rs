use clap::{Parser, Subcommand};

use crate::config::settings::ServerSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "flashcard review scheduler")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to the configured server port)
        #[arg(short, long, default_value_t = ServerSettings::default().port)]
        port: u16,
    },
    /// Draw the next card of a deck and record the view
    Study {
        /// Deck ID
        deck: i64,
    },
    /// Correct the view count of a card by a signed delta
    Adjust {
        /// Card ID
        card: i64,
        /// Views to add (negative to subtract)
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// List decks with their card counts
    Decks,
    /// List cards
    Cards {
        /// Only cards of this deck
        #[arg(short, long, conflicts_with = "unassigned")]
        deck: Option<i64>,
        /// Only cards that belong to no deck
        #[arg(short, long)]
        unassigned: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_delta_is_accepted() {
        let cli = Cli::try_parse_from(["cards", "adjust", "7", "-3"]).unwrap();
        assert_eq!(cli.command, Command::Adjust { card: 7, delta: -3 });
    }

    #[test]
    fn test_serve_default_port() {
        let cli = Cli::try_parse_from(["cards", "serve"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Serve {
                port: ServerSettings::default().port
            }
        );
        assert_eq!(cli.command, Command::Serve { port: 8081 });
    }

    #[test]
    fn test_card_filters_conflict() {
        assert!(Cli::try_parse_from(["cards", "cards", "--deck", "1", "--unassigned"]).is_err());
    }
}
