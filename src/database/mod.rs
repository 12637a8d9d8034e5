pub mod cards;
pub mod connection;
pub mod decks;
pub mod membership;
pub mod models;
pub mod setup;

pub use connection::{DbConn, DbPool, create_pool, get_connection};
pub use models::*;
pub use setup::open_database;
