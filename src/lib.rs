//! Session recording and metrics for sequence-span memory games.
//!
//! A game controller drives one [`SessionRecorder`] and one [`RoundTracker`]
//! per session, then folds the finished rounds through [`MetricsEngine`]. The
//! results are plain values ready for any storage collaborator; [`db::Database`]
//! is the bundled SQLite one.

pub mod clock;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;
pub mod recorder;
pub mod rounds;
pub mod settings;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AnalyticsError, AnalyticsResult};
pub use metrics::{LevelSummary, MetricsConfig, MetricsEngine, MetricsRecord};
pub use models::{
    AnalysisGameSession, EventEntry, RawEvent, Round, RoundStamp, Session, SessionOutcome, Tap,
};
pub use recorder::{RecorderSnapshot, SessionRecorder};
pub use rounds::RoundTracker;
pub use settings::{AnalyticsSettings, SettingsStore};
