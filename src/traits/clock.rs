use std::cell::Cell;
use std::time::Instant;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clock unavailable: {0}")]
pub struct ClockError(pub String);

/// Abstraction over playback time sources.
/// Implementations: SystemClock (production), MockClock (testing),
/// PausableClock (gameplay time excluding paused spans).
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch. Monotonic.
    fn now_ms(&self) -> Result<i64, ClockError>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Result<i64, ClockError> {
        (**self).now_ms()
    }
}

/// Wall clock backed by `std::time::Instant`.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Result<i64, ClockError> {
        Ok(self.start.elapsed().as_millis() as i64)
    }
}

/// Deterministic clock for tests and simulation.
pub struct MockClock {
    current_ms: Cell<i64>,
    available: Cell<bool>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
            available: Cell::new(true),
        }
    }

    /// A clock whose every reading fails.
    pub fn unavailable() -> Self {
        let clock = Self::new();
        clock.available.set(false);
        clock
    }

    pub fn set_time(&self, ms: i64) {
        self.current_ms.set(ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.current_ms.set(self.current_ms.get() + delta_ms);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> Result<i64, ClockError> {
        if !self.available.get() {
            return Err(ClockError("mock clock disabled".to_string()));
        }
        Ok(self.current_ms.get())
    }
}

/// Gameplay clock: wraps a wall clock and freezes while paused, so readings
/// never include time spent in a pause.
pub struct PausableClock<C> {
    inner: C,
    paused_at_ms: Cell<Option<i64>>,
    paused_total_ms: Cell<i64>,
}

impl<C: Clock> PausableClock<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            paused_at_ms: Cell::new(None),
            paused_total_ms: Cell::new(0),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at_ms.get().is_some()
    }

    /// Freeze gameplay time. Returns the wall reading the pause started at.
    pub fn pause(&self) -> Result<i64, ClockError> {
        let now = self.inner.now_ms()?;
        if self.paused_at_ms.get().is_none() {
            self.paused_at_ms.set(Some(now));
        }
        Ok(now)
    }

    /// Unfreeze gameplay time. Returns the wall reading the pause ended at.
    pub fn resume(&self) -> Result<i64, ClockError> {
        let now = self.inner.now_ms()?;
        if let Some(start) = self.paused_at_ms.take() {
            self.paused_total_ms
                .set(self.paused_total_ms.get() + (now - start).max(0));
        }
        Ok(now)
    }

    /// Total wall time spent paused, including an open pause.
    pub fn paused_ms(&self) -> Result<i64, ClockError> {
        let open = match self.paused_at_ms.get() {
            Some(start) => (self.inner.now_ms()? - start).max(0),
            None => 0,
        };
        Ok(self.paused_total_ms.get() + open)
    }
}

impl<C: Clock> Clock for PausableClock<C> {
    fn now_ms(&self) -> Result<i64, ClockError> {
        let wall = self.inner.now_ms()?;
        Ok(wall - self.paused_ms()?)
    }
}
