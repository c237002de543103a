use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{RecorderState, RecorderStatus};
use crate::{
    clock::{Clock, SystemClock},
    error::{AnalyticsError, AnalyticsResult},
    log_info, log_warn,
    models::{EventEntry, RawEvent, Session, SessionOutcome},
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecorderSnapshot {
    pub status: RecorderStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub event_count: usize,
    pub duration_secs: f64,
}

/// Owns the lifecycle and audit log of one session at a time.
///
/// A recorder is driven by a single game controller; reuse it for the next
/// session by calling `start()` again once the previous one has ended.
pub struct SessionRecorder<C: Clock = SystemClock> {
    game_id: String,
    user_id: String,
    clock: C,
    state: RecorderState,
}

impl SessionRecorder<SystemClock> {
    pub fn new(game_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::with_clock(game_id, user_id, SystemClock)
    }
}

impl<C: Clock> SessionRecorder<C> {
    pub fn with_clock(game_id: impl Into<String>, user_id: impl Into<String>, clock: C) -> Self {
        Self {
            game_id: game_id.into(),
            user_id: user_id.into(),
            clock,
            state: RecorderState::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Begin a fresh session. Calling this while recording silently discards
    /// the running session and starts over.
    pub fn start(&mut self) -> &str {
        if self.state.is_recording() {
            log_warn!(
                "Restarting recorder for game {}; discarding {} events from session {:?}",
                self.game_id,
                self.state.event_count,
                self.state.session_id
            );
        }

        let session_id = Uuid::new_v4().to_string();
        let started_at = self.clock.now_utc();
        self.state
            .begin(session_id, started_at, self.clock.monotonic());

        log_info!(
            "Session started for game {} (user {})",
            self.game_id, self.user_id
        );

        self.state.session_id.as_deref().unwrap_or_default()
    }

    /// Append a timestamped event. Dropped with a warning when no session is
    /// recording; telemetry loss must never interrupt gameplay.
    pub fn record_event(&mut self, event: RawEvent) {
        if !self.state.is_recording() {
            log_warn!(
                "Dropping '{}' event: no active session for game {}",
                event.event_type,
                self.game_id
            );
            return;
        }

        let entry = EventEntry::stamped(event, self.clock.now_utc());
        self.state.push(entry);
    }

    pub fn end(
        &mut self,
        outcome: SessionOutcome,
        final_score: f64,
        metadata: Option<Map<String, Value>>,
    ) -> AnalyticsResult<Session> {
        if !self.state.is_recording() {
            return Err(AnalyticsError::InvalidState("no active session"));
        }

        let session_id = self
            .state
            .session_id
            .clone()
            .ok_or(AnalyticsError::InvalidState("missing session id"))?;
        let start_time = self
            .state
            .started_at
            .ok_or(AnalyticsError::InvalidState("missing start time"))?;
        let end_time = self.clock.now_utc();
        let events = self.state.finish(end_time, self.clock.monotonic());

        log_info!(
            "Session {} ended as {} with {} events after {:.1}s",
            session_id,
            outcome.as_str(),
            events.len(),
            self.duration_secs()
        );

        Ok(Session {
            id: session_id,
            game_id: self.game_id.clone(),
            user_id: self.user_id.clone(),
            start_time,
            end_time,
            outcome,
            final_score,
            events,
            metadata: metadata.unwrap_or_default(),
        })
    }

    pub fn abandon(&mut self) -> AnalyticsResult<Session> {
        let mut metadata = Map::new();
        metadata.insert("reason".into(), Value::from("user_abandoned"));
        self.end(SessionOutcome::Abandoned, 0.0, Some(metadata))
    }

    /// Seconds since `start()`; fixed once the session has ended, zero if it
    /// never started.
    pub fn duration_secs(&self) -> f64 {
        self.state.elapsed_ms(self.clock.monotonic()) as f64 / 1000.0
    }

    pub fn is_active(&self) -> bool {
        self.state.is_recording()
    }

    pub fn event_count(&self) -> usize {
        self.state.event_count
    }

    pub fn events(&self) -> &[EventEntry] {
        &self.state.events
    }

    pub fn session_id(&self) -> Option<&str> {
        self.state.session_id.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.state.started_at
    }

    pub fn snapshot(&self) -> RecorderSnapshot {
        RecorderSnapshot {
            status: self.state.status,
            session_id: self.state.session_id.clone(),
            started_at: self.state.started_at,
            event_count: self.state.event_count,
            duration_secs: self.duration_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;
    use serde_json::json;

    fn recorder() -> (SessionRecorder<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap());
        (
            SessionRecorder::with_clock("corsi-blocks", "user-7", clock.clone()),
            clock,
        )
    }

    #[test]
    fn duration_is_zero_before_start() {
        let (recorder, _) = recorder();
        assert_eq!(recorder.duration_secs(), 0.0);
        assert!(!recorder.is_active());
    }

    #[test]
    fn events_are_kept_in_call_order() {
        let (mut recorder, clock) = recorder();
        recorder.start();
        recorder.record_event(RawEvent::new("sequence_shown", json!([1, 4, 2])));
        clock.advance_ms(800);
        recorder.record_event(RawEvent::new("tap", 1).with_correct(true));
        recorder.record_event(RawEvent::new("tap", 1).with_correct(true));

        let types: Vec<_> = recorder
            .events()
            .iter()
            .map(|e| e.event_type.as_str())
            .collect();
        assert_eq!(types, ["sequence_shown", "tap", "tap"]);
        assert_eq!(recorder.event_count(), 3);
        assert!(recorder.events()[1].timestamp > recorder.events()[0].timestamp);
    }

    #[test]
    fn events_before_start_are_dropped() {
        let (mut recorder, _) = recorder();
        recorder.record_event(RawEvent::new("tap", 3));
        assert_eq!(recorder.event_count(), 0);

        recorder.start();
        assert_eq!(recorder.event_count(), 0);
    }

    #[test]
    fn end_freezes_session_and_duration() {
        let (mut recorder, clock) = recorder();
        recorder.start();
        recorder.record_event(RawEvent::new("round_complete", 3).with_correct(true));
        clock.advance_ms(12_500);

        let session = recorder
            .end(SessionOutcome::Completed, 42.0, None)
            .unwrap();
        assert_eq!(session.outcome, SessionOutcome::Completed);
        assert_eq!(session.final_score, 42.0);
        assert_eq!(session.events.len(), 1);
        assert_eq!(session.game_id, "corsi-blocks");
        assert_eq!(session.duration_secs(), 12.5);

        clock.advance_ms(60_000);
        assert_eq!(recorder.duration_secs(), 12.5);
        assert!(!recorder.is_active());
    }

    #[test]
    fn second_end_is_invalid_state() {
        let (mut recorder, _) = recorder();
        recorder.start();
        recorder.end(SessionOutcome::Completed, 1.0, None).unwrap();

        let err = recorder
            .end(SessionOutcome::Completed, 1.0, None)
            .unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidState("no active session"));
        assert_eq!(err.to_string(), "invalid state: no active session");
    }

    #[test]
    fn events_after_end_are_dropped() {
        let (mut recorder, _) = recorder();
        recorder.start();
        recorder.record_event(RawEvent::new("tap", 1));
        let session = recorder.abandon().unwrap();
        recorder.record_event(RawEvent::new("tap", 2));

        assert_eq!(session.events.len(), 1);
        assert_eq!(recorder.event_count(), 1);
    }

    #[test]
    fn abandon_records_reason() {
        let (mut recorder, _) = recorder();
        recorder.start();
        let session = recorder.abandon().unwrap();

        assert_eq!(session.outcome, SessionOutcome::Abandoned);
        assert_eq!(session.final_score, 0.0);
        assert_eq!(session.metadata["reason"], "user_abandoned");
    }

    #[test]
    fn abandon_without_session_fails() {
        let (mut recorder, _) = recorder();
        assert!(recorder.abandon().is_err());
    }

    #[test]
    fn restart_clears_log_and_mints_new_id() {
        let (mut recorder, clock) = recorder();
        let first = recorder.start().to_string();
        recorder.record_event(RawEvent::new("tap", 1));
        clock.advance_ms(5_000);

        let second = recorder.start().to_string();
        assert_ne!(first, second);
        assert_eq!(recorder.event_count(), 0);
        assert_eq!(recorder.duration_secs(), 0.0);
        assert!(recorder.is_active());
    }

    #[test]
    fn snapshot_reports_live_duration() {
        let (mut recorder, clock) = recorder();
        recorder.start();
        recorder.record_event(RawEvent::new("tap", 1));
        clock.advance_ms(2_000);

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.status, RecorderStatus::Recording);
        assert_eq!(snapshot.event_count, 1);
        assert_eq!(snapshot.duration_secs, 2.0);
        assert_eq!(snapshot.session_id.as_deref(), recorder.session_id());
    }
}
