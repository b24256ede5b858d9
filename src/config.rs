/// Default largest interval an [crate::IntervalMap] accepts: `2^24` addresses, a `/8`.
pub const DEFAULT_MAX_SPAN: u64 = 1 << 24;

/// Default initial capacity of an [crate::IntervalMap].
pub const DEFAULT_CAPACITY: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Interval map configurations
pub struct Config {
    /// Largest number of addresses a single stored interval may span.
    ///
    /// Applied to every inserted interval, to the intervals produced by
    /// coalescing, and again by [crate::IntervalMap::valid].
    ///
    /// Defaults to [DEFAULT_MAX_SPAN]
    pub max_span: u64,
    /// Number of intervals to reserve room for up front.
    ///
    /// Defaults to [DEFAULT_CAPACITY]
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_span: DEFAULT_MAX_SPAN,
            capacity: DEFAULT_CAPACITY,
        }
    }
}
