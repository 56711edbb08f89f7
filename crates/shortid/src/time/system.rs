#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// A [`TimeSource`] backed by the system wall clock.
///
/// Every read follows the OS clock, including backwards steps; generators
/// default to [`MonotonicClock`](crate::MonotonicClock), which reads this
/// clock only once.
///
/// A clock set before 1970 reads as `0`, and a reading past the year 2554
/// saturates at `u64::MAX`.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource<u64> for SystemClock {
    fn current_nanos(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
            })
    }
}
