use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Round;
use crate::metrics::MetricsRecord;

/// The analytics record handed to storage alongside the frozen session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisGameSession {
    pub session_id: String,
    pub game_id: String,
    pub user_id: String,
    pub user_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub metrics: MetricsRecord,
    pub rounds: Vec<Round>,
}
