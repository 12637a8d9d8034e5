pub mod picker;
pub mod review;
pub mod selection;
mod time;
pub mod weighting;

pub use picker::pick_next_card;
pub use review::{Adjustment, adjust_views, mark_viewed};
pub use selection::{select_index, select_weighted};
pub use time::elapsed_hours;
pub use weighting::compute_weight;
