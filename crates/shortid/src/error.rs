/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `shortid` can emit.
///
/// Every variant is a validation failure raised synchronously by the call that
/// broke its contract. Nothing is retried internally.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The worker number is outside `[0, 31]`.
    #[error("expected worker in the range [0,31], found {worker}")]
    InvalidWorker { worker: i64 },

    /// The alphabet does not contain exactly 64 characters.
    #[error("alphabet must contain 64 unique characters, found {len}")]
    InvalidAlphabetLength { len: usize },

    /// The alphabet contains the same character more than once.
    #[error("alphabet must contain unique characters only, {symbol:?} repeats")]
    DuplicateSymbol { symbol: char },

    /// The number of data bits per symbol is outside `[4, 6]`.
    ///
    /// Callers of the generator never choose this value, so seeing it outside
    /// of direct [`Alphabet`](crate::Alphabet) use points at a bug in this
    /// crate.
    #[error("allowed digits range [4,6], found {digits}")]
    InvalidDigits { digits: u32 },

    /// The requested number of symbols would truncate the value.
    #[error("cannot accommodate data, need {needed} symbols, got {requested}")]
    InsufficientSymbols { needed: usize, requested: usize },

    /// A character being decoded is not part of the alphabet.
    #[error("symbol {symbol:?} at index {index} is not in the alphabet")]
    UnknownSymbol { symbol: char, index: usize },

    /// The decoded value does not fit in 64 bits.
    #[error("decoded value overflows 64 bits")]
    DecodeOverflow,

    /// The string is too short to be an ID from this generator.
    #[error("an id has at least 9 symbols, found {len}")]
    InvalidIdLength { len: usize },

    /// The generator state lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator state lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
