//! Clocks for the terminal session.
//!
//! Typing-test timing goes through [`Clock`] so tests can step time by hand.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Time since `start`, zero if `start` lies in the future
    fn since(&self, start: Instant) -> Duration {
        self.now().saturating_duration_since(start)
    }
}

pub type SharedClock = Arc<dyn Clock>;

/// Wall clock
pub struct SystemClock;

impl SystemClock {
    pub fn shared() -> SharedClock {
        Arc::new(SystemClock)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that stands still until [`ManualClock::advance`] is called.
///
/// ```
/// use folio::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::shared();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(30));
/// assert_eq!(clock.since(start), Duration::from_secs(30));
/// ```
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, step: Duration) {
        if let Ok(mut offset) = self.offset.lock() {
            *offset += step;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().map(|o| *o).unwrap_or_default();
        self.origin + offset
    }
}
