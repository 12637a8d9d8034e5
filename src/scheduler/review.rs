use chrono::{DateTime, Utc};

use crate::domain::Card;

/// Result of a manual view-count correction
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub card: Card,
    pub delta: i64,
    /// The requested delta would have left the count outside `0..=u32::MAX`
    pub clamped: bool,
}

/// Registers a view: stamps `now` as the last view and bumps the count
pub fn mark_viewed(card: &Card, now: DateTime<Utc>) -> Card {
    Card {
        views: card.views.saturating_add(1),
        last_view: now,
        ..card.clone()
    }
}

/// Shifts the view count by `delta` without touching the last view time.
/// Counts are clamped at zero instead of going negative.
pub fn adjust_views(card: &Card, delta: i64) -> Adjustment {
    let target = i64::from(card.views).saturating_add(delta);
    let views = clamp_views(target);

    Adjustment {
        card: Card {
            views,
            ..card.clone()
        },
        delta,
        clamped: i64::from(views) != target,
    }
}

fn clamp_views(target: i64) -> u32 {
    u32::try_from(target.max(0)).unwrap_or(u32::MAX)
}
