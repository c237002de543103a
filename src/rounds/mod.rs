mod attempts;
pub mod tracker;

pub use attempts::AttemptCounter;
pub use tracker::RoundTracker;
