use std::time::Instant;

use super::AttemptCounter;
use crate::{
    clock::Clock,
    log_warn,
    models::{Round, RoundStamp, Tap},
};

const ENABLE_LOGS: bool = true;

/// Per-session round bookkeeping: attempt numbers per level and the ordered
/// log of finalized rounds.
#[derive(Debug, Clone)]
pub struct RoundTracker {
    attempts: AttemptCounter,
    rounds: Vec<Round>,
    /// Zero point of the monotonic millisecond clock used for taps and stamps.
    origin: Instant,
}

impl RoundTracker {
    pub fn new(origin: Instant) -> Self {
        Self {
            attempts: AttemptCounter::new(),
            rounds: Vec::new(),
            origin,
        }
    }

    pub fn from_clock<C: Clock>(clock: &C) -> Self {
        Self::new(clock.monotonic())
    }

    /// Forget all attempts and rounds; call when a new session starts.
    pub fn reset(&mut self, origin: Instant) {
        self.attempts.clear();
        self.rounds.clear();
        self.origin = origin;
    }

    pub fn next_attempt_number(&mut self, level: u32) -> u32 {
        self.attempts.next(level)
    }

    pub fn attempts_at(&self, level: u32) -> u32 {
        self.attempts.attempts_at(level)
    }

    /// Milliseconds since the tracker's origin, for stamping taps.
    pub fn elapsed_ms<C: Clock>(&self, clock: &C) -> f64 {
        let elapsed = clock.monotonic().saturating_duration_since(self.origin);
        elapsed.as_nanos() as f64 / 1_000_000.0
    }

    pub fn stamp<C: Clock>(&self, clock: &C) -> RoundStamp {
        RoundStamp {
            at: clock.now_utc(),
            perf_ms: self.elapsed_ms(clock),
        }
    }

    /// Build a `Round`. Elapsed time comes from the monotonic side of the
    /// stamps; the wall-clock side is kept for display only.
    pub fn finalize_round(
        level: u32,
        attempt: u32,
        is_correct: bool,
        taps: Vec<Tap>,
        start: RoundStamp,
        end: RoundStamp,
    ) -> Round {
        let elapsed_ms = end.perf_ms - start.perf_ms;
        if elapsed_ms < 0.0 {
            log_warn!(
                "Round at level {level} ended {:.0}ms before it started; clamping to zero",
                -elapsed_ms
            );
        }

        let round = Round {
            level,
            attempt,
            is_correct,
            time_taken: elapsed_ms.max(0.0) / 1000.0,
            taps,
            start_time: start.at,
            end_time: end.at,
        };

        if !round.has_contiguous_positions() {
            log_warn!(
                "Round at level {level} (attempt {attempt}) has non-contiguous tap positions"
            );
        }

        round
    }

    /// Append a finalized round to the session's round log.
    pub fn commit(&mut self, round: Round) {
        self.rounds.push(round);
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn take_rounds(&mut self) -> Vec<Round> {
        std::mem::take(&mut self.rounds)
    }
}
