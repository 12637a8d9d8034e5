use crate::domain::DeckSettings;

#[derive(Debug, Clone)]
pub struct CardDefaults {
    pub front: String,
    pub back: String,
}

impl Default for CardDefaults {
    fn default() -> Self {
        Self {
            front: "NewCard".to_string(),
            back: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "cards.db".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 8081 }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Coefficients given to decks created without explicit settings
    pub deck_defaults: DeckSettings,
    pub card: CardDefaults,
    pub storage: StorageSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            deck_defaults: DeckSettings::default(),
            card: CardDefaults::default(),
            storage: StorageSettings::default(),
            server: ServerSettings::default(),
        }
    }

    /// Same defaults, but backed by the given database file
    pub fn with_database(database_path: impl Into<String>) -> Self {
        Self {
            storage: StorageSettings {
                database_path: database_path.into(),
            },
            ..Self::new()
        }
    }
}
