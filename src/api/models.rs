use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Card, CardId, DeckConfig, DeckId, DeckSettings};
use crate::errors::{ReviewError, ReviewResult};

/// Body of `POST /api/decks`; omitted coefficients fall back to the configured defaults
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRequest {
    pub name: String,
    pub date_weight: Option<f64>,
    pub view_weight: Option<f64>,
    pub view_limit: Option<i64>,
}

impl DeckRequest {
    pub fn settings(&self, defaults: DeckSettings) -> ReviewResult<DeckSettings> {
        merge_settings(
            defaults,
            self.date_weight,
            self.view_weight,
            self.view_limit,
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckUpdateRequest {
    pub name: Option<String>,
    pub date_weight: Option<f64>,
    pub view_weight: Option<f64>,
    pub view_limit: Option<i64>,
}

impl DeckUpdateRequest {
    pub fn apply(&self, deck: &mut DeckConfig) -> ReviewResult<()> {
        let settings = merge_settings(
            deck.settings(),
            self.date_weight,
            self.view_weight,
            self.view_limit,
        )?;
        if let Some(name) = &self.name {
            deck.name = checked_name(name)?;
        }
        deck.apply_settings(settings);
        Ok(())
    }
}

fn merge_settings(
    base: DeckSettings,
    date_weight: Option<f64>,
    view_weight: Option<f64>,
    view_limit: Option<i64>,
) -> ReviewResult<DeckSettings> {
    let view_limit = match view_limit {
        Some(limit) => u32::try_from(limit).map_err(|_| {
            ReviewError::InvalidSettings(format!(
                "viewLimit must be a non-negative integer, got {limit}"
            ))
        })?,
        None => base.view_limit,
    };

    let settings = DeckSettings {
        date_weight: date_weight.unwrap_or(base.date_weight),
        view_weight: view_weight.unwrap_or(base.view_weight),
        view_limit,
    };
    settings.validate()?;
    Ok(settings)
}

pub fn checked_name(name: &str) -> ReviewResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ReviewError::InvalidSettings(
            "deck name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

#[derive(Deserialize, Default)]
pub struct DeckParams {
    /// Only decks without any cards
    pub empty: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDetail {
    #[serde(flatten)]
    pub deck: DeckConfig,
    pub cards: Vec<Card>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    /// Deck the new card is added to
    pub deck: Option<DeckId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdateRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    pub views: Option<u32>,
    pub last_view: Option<DateTime<Utc>>,
}

impl CardUpdateRequest {
    pub fn apply(self, card: &mut Card) {
        if let Some(front) = self.front {
            card.front = front;
        }
        if let Some(back) = self.back {
            card.back = back;
        }
        if let Some(views) = self.views {
            card.views = views;
        }
        if let Some(last_view) = self.last_view {
            card.last_view = last_view;
        }
    }
}

#[derive(Deserialize, Default)]
pub struct CardParams {
    pub deck: Option<DeckId>,
    pub unassigned: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetail {
    #[serde(flatten)]
    pub card: Card,
    pub decks: Vec<DeckConfig>,
}

#[derive(Deserialize)]
pub struct AdjustViewsRequest {
    pub delta: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustViewsResponse {
    pub card: Card,
    pub clamped: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyResponse {
    pub deck_id: DeckId,
    pub card: Card,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub deck_id: DeckId,
    pub card_id: CardId,
    pub added: bool,
}
