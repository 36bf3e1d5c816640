use std::fmt::{self, Debug, Formatter};
use std::thread;
use std::time::{Duration, Instant};

/// Source of time for deadlines and settle delays.
///
/// The engine never calls `Instant::now` or `thread::sleep` directly; it
/// goes through this trait, so tests can drive the receive timeout and the
/// handshake's probe wait with simulated time (see `FakeClock` in
/// `touchlink-testing`).
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;

    /// Pauses the calling thread (or advances simulated time) by `duration`.
    fn sleep(&self, duration: Duration);
}

impl Debug for dyn Clock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<Clock trait>")
    }
}

/// The real time source: `Instant::now` and `thread::sleep`.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
