/// Default epoch: Friday, January 1, 2016 00:00:00 UTC, in nanoseconds.
///
/// The 40-bit millisecond field of an ID covers roughly 34.8 years from here.
pub const DEFAULT_EPOCH: u64 = 1_451_606_400_000_000_000;

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH: u64 = 0;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests.
///
/// The timestamp type `T` is generic (typically `u64`), and the unit is
/// **nanoseconds** since 1970-01-01T00:00:00Z. Generators subtract their own
/// epoch and truncate to milliseconds.
///
/// # Example
///
/// ```
/// use shortid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_nanos(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_nanos(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in nanoseconds since the UNIX epoch.
    fn current_nanos(&self) -> T;
}
