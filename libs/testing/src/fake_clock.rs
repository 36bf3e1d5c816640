use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use touchlink_core::Clock;

/// A manually advanced time source for tests.
///
/// Cloned handles share the same simulated time, so a test can hand one
/// clone to the engine and keep another to move time forward. `sleep`
/// advances the simulation instead of blocking, which makes code that
/// busy-waits on a deadline (the handshake's probe wait) run instantly
/// under test.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use touchlink_core::Clock;
/// use touchlink_testing::FakeClock;
///
/// let clock = FakeClock::new();
/// let handle = clock.clone();
///
/// let before = clock.now();
/// handle.advance(Duration::from_millis(250));
/// assert_eq!(Duration::from_millis(250), clock.now() - before);
/// ```
#[derive(Debug, Clone)]
pub struct FakeClock {
    epoch: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl FakeClock {
    /// Creates a new `FakeClock` starting at the present instant.
    pub fn new() -> Self {
        FakeClock {
            epoch: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Moves simulated time forward by `amount`.
    pub fn advance(&self, amount: Duration) {
        self.elapsed.set(self.elapsed.get() + amount);
    }

    /// Returns how much simulated time has passed since construction.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.epoch + self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
