use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ReviewError, ReviewResult};

pub type DeckId = i64;
pub type CardId = i64;

/// Unix timestamp of 0001-01-01T00:00:00Z, stored for cards that were never reviewed
pub const NEVER_VIEWED_TIMESTAMP: i64 = -62_135_596_800;

/// The "never viewed" sentinel. It is a real (far past) instant, so elapsed-time
/// arithmetic against it stays finite.
pub fn never_viewed() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(NEVER_VIEWED_TIMESTAMP, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Tunable scheduling coefficients of a deck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSettings {
    pub date_weight: f64,
    pub view_weight: f64,
    /// Number of views before views no longer have an effect on the weight
    pub view_limit: u32,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            date_weight: 1.0,
            view_weight: 1.0,
            view_limit: 1,
        }
    }
}

impl DeckSettings {
    pub fn validate(&self) -> ReviewResult<()> {
        check_coefficient("dateWeight", self.date_weight)?;
        check_coefficient("viewWeight", self.view_weight)
    }
}

fn check_coefficient(name: &str, value: f64) -> ReviewResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ReviewError::InvalidSettings(format!(
            "{name} must be a finite non-negative number, got {value}"
        )))
    }
}

/// A deck and its scheduling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckConfig {
    pub id: DeckId,
    pub name: String,
    pub date_weight: f64,
    pub view_weight: f64,
    pub view_limit: u32,
}

impl DeckConfig {
    pub fn settings(&self) -> DeckSettings {
        DeckSettings {
            date_weight: self.date_weight,
            view_weight: self.view_weight,
            view_limit: self.view_limit,
        }
    }

    pub fn apply_settings(&mut self, settings: DeckSettings) {
        self.date_weight = settings.date_weight;
        self.view_weight = settings.view_weight;
        self.view_limit = settings.view_limit;
    }
}

/// A front/back card together with its global review history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub views: u32,
    pub last_view: DateTime<Utc>,
}

impl Card {
    pub fn is_unviewed(&self) -> bool {
        self.last_view == never_viewed()
    }
}
