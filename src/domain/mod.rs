pub mod models;

pub use models::{Card, CardId, DeckConfig, DeckId, DeckSettings, never_viewed};
