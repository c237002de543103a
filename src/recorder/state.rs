use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::models::EventEntry;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum RecorderStatus {
    #[default]
    Idle,
    Recording,
    Ended,
}

#[derive(Debug, Clone, Default)]
pub struct RecorderState {
    pub status: RecorderStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub events: Vec<EventEntry>,
    /// Events recorded in the current or most recent session; survives
    /// `finish()` after the log itself has been handed over.
    pub event_count: usize,
    /// Monotonic instant at which recording began; elapsed time is measured
    /// from here while recording.
    pub running_anchor: Option<Instant>,
    /// Duration frozen at `end()`, so later reads never move.
    pub frozen_ms: Option<u64>,
}

impl RecorderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.status == RecorderStatus::Recording
    }

    pub fn begin(&mut self, session_id: String, start_at: DateTime<Utc>, now: Instant) {
        *self = Self {
            status: RecorderStatus::Recording,
            session_id: Some(session_id),
            started_at: Some(start_at),
            ended_at: None,
            events: Vec::new(),
            event_count: 0,
            running_anchor: Some(now),
            frozen_ms: None,
        };
    }

    pub fn push(&mut self, entry: EventEntry) {
        self.events.push(entry);
        self.event_count += 1;
    }

    /// Elapsed milliseconds: frozen once ended, live while recording, zero
    /// before the first start.
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        if let Some(frozen) = self.frozen_ms {
            return frozen;
        }
        match (self.status, self.running_anchor) {
            (RecorderStatus::Recording, Some(anchor)) => {
                now.saturating_duration_since(anchor).as_millis() as u64
            }
            _ => 0,
        }
    }

    /// Freeze timing and hand the event log over to the caller.
    pub fn finish(&mut self, ended_at: DateTime<Utc>, now: Instant) -> Vec<EventEntry> {
        self.frozen_ms = Some(self.elapsed_ms(now));
        self.status = RecorderStatus::Ended;
        self.ended_at = Some(ended_at);
        self.running_anchor = None;
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn idle_state_reports_zero() {
        let state = RecorderState::new();
        assert_eq!(state.elapsed_ms(Instant::now()), 0);
        assert!(!state.is_recording());
    }

    #[test]
    fn finish_freezes_elapsed_time() {
        let start = Instant::now();
        let mut state = RecorderState::new();
        state.begin("s1".into(), Utc::now(), start);
        assert_eq!(state.elapsed_ms(start + Duration::from_millis(250)), 250);

        state.finish(Utc::now(), start + Duration::from_millis(400));
        assert_eq!(state.elapsed_ms(start + Duration::from_secs(60)), 400);
        assert_eq!(state.status, RecorderStatus::Ended);
    }
}
