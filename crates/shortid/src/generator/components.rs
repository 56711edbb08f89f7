/// The values a [`ShortId`](crate::ShortId) packed into one identifier.
///
/// Returned by [`ShortId::decode`](crate::ShortId::decode). The random padding
/// bits are not recoverable and not part of the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Components {
    /// Milliseconds elapsed since the generator's epoch.
    pub millis: u64,
    /// Worker number in `[0, 31]`.
    pub worker: u8,
    /// IDs handed out earlier in the same millisecond.
    pub counter: u64,
}

impl Components {
    /// Milliseconds since the UNIX epoch, given the generator's epoch in
    /// nanoseconds.
    pub const fn unix_millis(&self, epoch: u64) -> u64 {
        epoch / 1_000_000 + self.millis
    }
}
