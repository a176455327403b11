//! Timer Abstractions
//!
//! Time base for acquisition timing and stopwatches for diagnostics.

use embassy_time::{Duration, Instant};

use crate::sampler::MonotonicClock;

/// Monotonic clock backed by the embassy time driver
#[derive(Clone, Copy, Debug, Default)]
pub struct UptimeClock;

impl MonotonicClock for UptimeClock {
    fn now_us(&mut self) -> u64 {
        Instant::now().as_micros()
    }
}

impl defmt::Format for UptimeClock {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "UptimeClock({}us)", Instant::now().as_micros());
    }
}

/// Stopwatch for timing measurements
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Create a stopwatch that is already running
    #[must_use]
    pub fn started() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the stopwatch was started
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Instant::now() - self.start
    }

    /// Get elapsed time in milliseconds
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis()
    }
}

impl defmt::Format for Stopwatch {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Stopwatch({}ms)", self.elapsed_ms());
    }
}
