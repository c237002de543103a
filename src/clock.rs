use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Time source consumed by the recorder and the round tracker.
///
/// Wall-clock time is only used for audit timestamps; every elapsed-time
/// calculation goes through `monotonic()`.
pub trait Clock {
    fn now_utc(&self) -> DateTime<Utc>;
    fn monotonic(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualState>>,
}

#[derive(Debug)]
struct ManualState {
    wall: DateTime<Utc>,
    base: Instant,
    offset: Duration,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualState {
                wall: start,
                base: Instant::now(),
                offset: Duration::ZERO,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.offset += by;
        // Durations beyond chrono's range are not meaningful for a test clock.
        if let Ok(delta) = chrono::Duration::from_std(by) {
            guard.wall += delta;
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Milliseconds elapsed on the monotonic side since the clock was created.
    pub fn elapsed_ms(&self) -> f64 {
        let guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.offset.as_nanos() as f64 / 1_000_000.0
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        match self.inner.lock() {
            Ok(guard) => guard.wall,
            Err(poisoned) => poisoned.into_inner().wall,
        }
    }

    fn monotonic(&self) -> Instant {
        let guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.base + guard.offset
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_utc(&self) -> DateTime<Utc> {
        (**self).now_utc()
    }

    fn monotonic(&self) -> Instant {
        (**self).monotonic()
    }
}
