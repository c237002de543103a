use serde::{Deserialize, Serialize};

use crate::models::{Round, Tap};

/// Derived performance metrics for one session.
///
/// Every numeric field has a defined zero for degenerate input so dashboards
/// can always render it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub max_span: u32,
    /// Seconds.
    pub total_session_time: f64,
    /// Percentage in `[0, 100]`.
    pub error_rate: f64,
    pub total_attempts: usize,
    pub successful_attempts: usize,
    pub persistence: usize,
    /// Mean milliseconds between consecutive correct taps of successful rounds.
    pub cognitive_fluency: f64,
    /// Signed percentage; positive means slowing down after an error.
    pub self_correction_index: f64,
    pub level_breakdown: Vec<LevelSummary>,
    pub all_taps: Vec<Tap>,
    pub rounds_data: Vec<Round>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub level: u32,
    pub attempts: usize,
    pub successes: usize,
    /// Seconds.
    pub mean_time_taken: f64,
}
