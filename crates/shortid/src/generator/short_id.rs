use core::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Alphabet, Components, DEFAULT_EPOCH, Error, MonotonicClock, RandSource, Result, SecureRandom,
    TimeSource,
    alphabet::needed_symbols,
    generator::{Mutex, MutexGuard},
};

/// Largest worker number; workers fit in one 5-bit symbol.
pub const MAX_WORKER: u8 = 31;

/// Symbols spent on the millisecond timestamp.
const TIMESTAMP_SYMBOLS: usize = 8;
/// Symbols spent on the worker number.
const WORKER_SYMBOLS: usize = 1;
/// Length of an ID without a counter suffix.
pub const ID_MIN_LEN: usize = TIMESTAMP_SYMBOLS + WORKER_SYMBOLS;
/// Data bits per symbol for the timestamp and worker, leaving one random bit.
const PADDED_DIGITS: u32 = 5;
/// Data bits per symbol for the counter: no randomness.
const COUNTER_DIGITS: u32 = 6;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// Millisecond bucket and the number of IDs already issued inside it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct State {
    millis: u64,
    counter: u64,
}

/// A thread-safe short ID generator.
///
/// Each ID is 8 symbols of elapsed milliseconds since the epoch, 1 symbol of
/// worker number, and, only when several IDs fall into the same millisecond,
/// the per-millisecond counter. Timestamp and worker symbols carry one random
/// bit each.
///
/// The worker number should differ between processes generating IDs into the
/// same data space. The seed, on the contrary, should be identical so they
/// all share the alphabet layout.
///
/// The millisecond/counter pair lives behind a [`Mutex`]; only that update is
/// serialised, encoding runs outside the lock.
///
/// # Example
/// ```
/// use shortid::{DEFAULT_ALPHABET, ShortId};
///
/// let generator = ShortId::new(0, DEFAULT_ALPHABET, 1).unwrap();
/// let id = generator.generate().unwrap();
/// assert!(id.len() >= 9);
/// ```
pub struct ShortId<T = MonotonicClock, R = SecureRandom>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    worker: u8,
    epoch: u64,
    abc: Alphabet,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<State>,
    time: T,
    rng: R,
}

impl ShortId {
    /// Creates a generator reading a [`MonotonicClock`] anchored now and the OS
    /// random source.
    ///
    /// # Errors
    /// - [`Error::InvalidWorker`] if `worker` is outside `[0, 31]`.
    /// - Any error of [`Alphabet::new`].
    pub fn new(worker: impl Into<i64>, alphabet: &str, seed: u64) -> Result<Self> {
        Self::with_sources(worker, alphabet, seed, MonotonicClock::new(), SecureRandom)
    }
}

impl Default for ShortId {
    /// Worker 0, [`DEFAULT_ALPHABET`](crate::DEFAULT_ALPHABET), seed 1.
    fn default() -> Self {
        Self::from_parts(0, Alphabet::default(), MonotonicClock::new(), SecureRandom)
    }
}

impl<T, R> ShortId<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    /// Creates a generator with explicit time and random sources.
    ///
    /// # Errors
    /// - [`Error::InvalidWorker`] if `worker` is outside `[0, 31]`.
    /// - Any error of [`Alphabet::new`].
    pub fn with_sources(
        worker: impl Into<i64>,
        alphabet: &str,
        seed: u64,
        time: T,
        rng: R,
    ) -> Result<Self> {
        let worker = worker.into();
        let worker = u8::try_from(worker)
            .ok()
            .filter(|w| *w <= MAX_WORKER)
            .ok_or(Error::InvalidWorker { worker })?;
        let abc = Alphabet::new(alphabet, seed)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(worker, seed, "short id generator created");

        Ok(Self::from_parts(worker, abc, time, rng))
    }

    fn from_parts(worker: u8, abc: Alphabet, time: T, rng: R) -> Self {
        Self {
            worker,
            epoch: DEFAULT_EPOCH,
            abc,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(State::default())),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(State::default()),
            time,
            rng,
        }
    }

    /// The worker number embedded in every ID.
    pub const fn worker(&self) -> u8 {
        self.worker
    }

    /// The epoch in nanoseconds since the UNIX epoch.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The shuffled alphabet IDs are rendered with.
    pub const fn alphabet(&self) -> &Alphabet {
        &self.abc
    }

    /// Generates a new ID from the current time.
    ///
    /// # Errors
    /// - [`Error::InsufficientSymbols`] once more than 2^40 milliseconds
    ///   (about 34.8 years) have passed since the epoch.
    /// - `Error::LockPoisoned` if another thread panicked while holding the
    ///   state lock (std mutex only).
    pub fn generate(&self) -> Result<String> {
        self.generate_with(|| self.time.current_nanos(), self.epoch)
    }

    /// Generates a new ID as if the clock read `now` nanoseconds, measured
    /// against `epoch` nanoseconds.
    ///
    /// A `now` before `epoch` counts as millisecond 0.
    ///
    /// # Errors
    /// Same as [`ShortId::generate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_at(&self, now: u64, epoch: u64) -> Result<String> {
        self.generate_with(|| now, epoch)
    }

    fn generate_with(&self, now: impl FnOnce() -> u64, epoch: u64) -> Result<String> {
        let State { millis, counter } = self.advance(now, epoch)?;

        let mut id = String::with_capacity(ID_MIN_LEN + 2);
        self.abc
            .encode_into(millis, TIMESTAMP_SYMBOLS, PADDED_DIGITS, &self.rng, &mut id)?;
        self.abc.encode_into(
            u64::from(self.worker),
            WORKER_SYMBOLS,
            PADDED_DIGITS,
            &self.rng,
            &mut id,
        )?;
        if counter > 0 {
            self.abc
                .encode_into(counter, 0, COUNTER_DIGITS, &self.rng, &mut id)?;
        }
        Ok(id)
    }

    /// Splits an ID rendered with this generator's alphabet back into its
    /// millisecond, worker and counter values.
    ///
    /// # Errors
    /// - [`Error::InvalidIdLength`] if `id` has fewer than 9 symbols.
    /// - [`Error::UnknownSymbol`] if `id` contains a foreign character.
    /// - [`Error::DecodeOverflow`] if the counter does not fit in a `u64`.
    pub fn decode(&self, id: &str) -> Result<Components> {
        let len = id.chars().count();
        if len < ID_MIN_LEN {
            return Err(Error::InvalidIdLength { len });
        }
        let worker_at = byte_offset(id, TIMESTAMP_SYMBOLS);
        let counter_at = byte_offset(id, ID_MIN_LEN);

        let millis = self.abc.decode(&id[..worker_at], PADDED_DIGITS)?;
        let worker = self
            .abc
            .decode(&id[worker_at..counter_at], PADDED_DIGITS)
            .map_err(|e| offset_symbol_index(e, TIMESTAMP_SYMBOLS))?;
        let counter = self
            .abc
            .decode(&id[counter_at..], COUNTER_DIGITS)
            .map_err(|e| offset_symbol_index(e, ID_MIN_LEN))?;

        Ok(Components {
            millis,
            // One 5-bit symbol never exceeds 31.
            worker: worker as u8,
            counter,
        })
    }

    /// Moves the state to the millisecond `now` falls into and returns a copy.
    ///
    /// The clock is read while the lock is held, so callers serialised by the
    /// lock also observe time in that order. A millisecond too large for the
    /// timestamp field leaves the state untouched.
    fn advance(&self, now: impl FnOnce() -> u64, epoch: u64) -> Result<State> {
        let mut state = self.lock()?;
        let millis = now().saturating_sub(epoch) / NANOS_PER_MILLI;
        let needed = needed_symbols(millis, PADDED_DIGITS);
        if needed > TIMESTAMP_SYMBOLS {
            return Err(Error::InsufficientSymbols {
                needed,
                requested: TIMESTAMP_SYMBOLS,
            });
        }
        if state.millis == millis {
            state.counter += 1;
        } else {
            *state = State { millis, counter: 0 };
        }
        Ok(*state)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, Error> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T, R> fmt::Display for ShortId<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShortId(worker={}, epoch={}, abc={})",
            self.worker, self.epoch, self.abc
        )
    }
}

impl<T, R> fmt::Debug for ShortId<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortId")
            .field("worker", &self.worker)
            .field("epoch", &self.epoch)
            .field("abc", &self.abc)
            .finish_non_exhaustive()
    }
}

/// Byte offset of the `n`th character, or the end of `s`.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

fn offset_symbol_index(err: Error, by: usize) -> Error {
    match err {
        Error::UnknownSymbol { symbol, index } => Error::UnknownSymbol {
            symbol,
            index: index + by,
        },
        other => other,
    }
}
