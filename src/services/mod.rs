pub mod server;
pub mod study;

pub use study::{Clock, StudyOutcome, StudyService, SystemClock};
