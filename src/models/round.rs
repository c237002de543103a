use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tap;

/// A point in time captured on both clocks: wall-clock for display and
/// ordering, monotonic milliseconds for elapsed-time math.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundStamp {
    pub at: DateTime<Utc>,
    pub perf_ms: f64,
}

/// One attempt at reproducing a sequence of `level` symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub level: u32,
    /// 1-based attempt number at this level within the session.
    pub attempt: u32,
    pub is_correct: bool,
    /// Seconds from round-ready to submission.
    pub time_taken: f64,
    pub taps: Vec<Tap>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Round {
    pub fn is_retry(&self) -> bool {
        self.attempt > 1
    }

    /// True when tap positions run 0, 1, 2, ... without gaps.
    pub fn has_contiguous_positions(&self) -> bool {
        self.taps
            .iter()
            .enumerate()
            .all(|(idx, tap)| tap.position == idx)
    }

    pub fn correct_taps(&self) -> impl Iterator<Item = &Tap> {
        self.taps.iter().filter(|tap| tap.is_correct)
    }
}
