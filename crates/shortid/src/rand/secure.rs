use core::cell::RefCell;
use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hasher},
    sync::atomic::{AtomicBool, Ordering},
};

use rand::{RngCore, SeedableRng, TryRngCore, rngs::OsRng, rngs::SmallRng};

use crate::{RandSource, SystemClock, TimeSource};

thread_local! {
    /// Per-thread pseudo-random generator used once the OS source has failed.
    static FALLBACK: RefCell<SmallRng> = RefCell::new(SmallRng::seed_from_u64(process_entropy()));
}

/// Set after the first OS failure so the fallback is reported only once.
static FELL_BACK: AtomicBool = AtomicBool::new(false);

/// A `RandSource` that reads the operating system's cryptographic source and
/// never fails.
///
/// Each draw goes to [`OsRng`]. If the OS source reports an error, the draw is
/// served instead by a thread-local [`SmallRng`] seeded from process entropy
/// (a hashed wall-clock reading mixed with the std hasher's random keys).
///
/// The fallback trades unpredictability for availability. Random bits only
/// ever fill the padding positions of an encoded symbol, so their quality
/// affects collision resistance, never the encoded data.
#[derive(Default, Clone, Copy, Debug)]
pub struct SecureRandom;

impl SecureRandom {
    #[cold]
    #[inline(never)]
    fn fallback_u64() -> u64 {
        if !FELL_BACK.swap(true, Ordering::Relaxed) {
            #[cfg(feature = "tracing")]
            tracing::warn!("OS random source unavailable, using pseudo-random fallback");
        }
        FALLBACK.with(|rng| rng.borrow_mut().next_u64())
    }
}

impl RandSource<u64> for SecureRandom {
    fn rand(&self) -> u64 {
        match OsRng.try_next_u64() {
            Ok(value) => value,
            Err(_) => Self::fallback_u64(),
        }
    }
}

/// Mixes the current time with the randomly keyed std hasher.
fn process_entropy() -> u64 {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(SystemClock.current_nanos());
    hasher.write_usize(&FELL_BACK as *const AtomicBool as usize);
    hasher.finish()
}
