pub mod base;
pub mod memory;
pub mod sqlite;

pub use base::{CardStore, ReviewSession};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
