//! Process-wide default generator.
//!
//! Prefer passing a [`ShortId`] to the code that needs it. The default exists
//! for call sites where threading a generator through is impractical: it is
//! built on first use (worker 0, default alphabet, seed 1) and can be replaced
//! with [`set_default`].
//!
//! # Example
//! ```
//! use shortid::{DEFAULT_ALPHABET, ShortId, generate_default, get_default, set_default};
//!
//! assert_eq!(get_default().worker(), 0);
//!
//! set_default(ShortId::new(3, DEFAULT_ALPHABET, 1).unwrap());
//! assert_eq!(get_default().worker(), 3);
//!
//! let id = generate_default().unwrap();
//! assert_eq!(get_default().decode(&id).unwrap().worker, 3);
//! ```

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::{Result, ShortId};

static DEFAULT: LazyLock<RwLock<Arc<ShortId>>> =
    LazyLock::new(|| RwLock::new(Arc::new(ShortId::default())));

/// Returns the process-wide generator, creating it on first use.
///
/// The returned handle stays valid after a later [`set_default`]; it keeps
/// generating from its own state.
pub fn get_default() -> Arc<ShortId> {
    // The guarded value is a single `Arc`, so a poisoned lock still holds a
    // complete one.
    let guard = DEFAULT.read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
}

/// Replaces the process-wide generator and returns the previous one.
///
/// Calls racing with the swap see either the old or the new generator. Two
/// generators with the same worker number running side by side can produce
/// the same ID within one millisecond, so replace the default before other
/// threads start generating, or keep the worker number unchanged.
pub fn set_default(generator: ShortId) -> Arc<ShortId> {
    #[cfg(feature = "tracing")]
    tracing::debug!(worker = generator.worker(), "replacing default short id generator");

    let mut guard = DEFAULT.write().unwrap_or_else(PoisonError::into_inner);
    core::mem::replace(&mut *guard, Arc::new(generator))
}

/// Generates an ID with the process-wide generator.
///
/// # Errors
/// Same as [`ShortId::generate`].
pub fn generate_default() -> Result<String> {
    get_default().generate()
}
