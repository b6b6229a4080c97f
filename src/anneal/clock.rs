//! Time sources for the search loop.

use std::time::{Duration, Instant};

/// Reports time elapsed since the start of a run.
///
/// The annealer queries the clock once per iteration, after the iteration
/// completes.
pub trait Clock {
    fn elapsed(&mut self) -> Duration;
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    started: Instant,
}

impl WallClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn elapsed(&mut self) -> Duration {
        self.started.elapsed()
    }
}

/// Deterministic clock that advances by a fixed step on every query.
///
/// With a fixed seed, a run driven by this clock is fully reproducible.
///
/// ```
/// use std::time::Duration;
/// use u_pdp::anneal::{Clock, StepClock};
///
/// let mut clock = StepClock::new(Duration::from_millis(2));
/// assert_eq!(clock.elapsed(), Duration::from_millis(2));
/// assert_eq!(clock.elapsed(), Duration::from_millis(4));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StepClock {
    step: Duration,
    now: Duration,
}

impl StepClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            now: Duration::ZERO,
        }
    }
}

impl Clock for StepClock {
    fn elapsed(&mut self) -> Duration {
        self.now += self.step;
        self.now
    }
}
