#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::Instant;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::Instant;

use crate::{SystemClock, TimeSource};

/// A monotonic [`TimeSource`] aligned to the wall clock once, at construction.
///
/// The clock captures the wall-clock time and an [`Instant`] together, then
/// reports the anchor plus the time elapsed on the monotonic timer. Later
/// wall-clock adjustments (NTP steps, manual changes) never move it backwards,
/// so a generator reading it never revisits a millisecond it already left.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    anchor_nanos: u64,
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors the clock to the current wall-clock time.
    pub fn new() -> Self {
        Self::with_anchor(SystemClock.current_nanos())
    }

    /// Anchors the clock to `anchor_nanos` nanoseconds since the UNIX epoch;
    /// the first read returns at least that value.
    pub fn with_anchor(anchor_nanos: u64) -> Self {
        Self {
            anchor_nanos,
            start: Instant::now(),
        }
    }
}

impl TimeSource<u64> for MonotonicClock {
    fn current_nanos(&self) -> u64 {
        let elapsed = u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.anchor_nanos.saturating_add(elapsed)
    }
}
