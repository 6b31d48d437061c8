/// Default source-buffer capacity: libzstd's recommended streaming input
/// chunk is just over 128 KiB, so one fill keeps a whole compressed block
/// plus its header in flight.
pub const DEFAULT_SRC_CAPACITY: usize = 128 * 1024;

/// Default destination-buffer capacity: one maximum-size decompressed zstd
/// block (128 KiB).
pub const DEFAULT_DST_CAPACITY: usize = 128 * 1024;

/// Buffer sizing for a [`StreamDriver`](crate::StreamDriver) run.
///
/// Capacities are fixed for the lifetime of the run — they bound peak
/// memory to `src_capacity + dst_capacity` regardless of stream length,
/// which is the central resource guarantee of the design. They are build
/// time constants for the shipped binary, not runtime flags; non-default
/// values exist for tests that want to force compaction and suspension on
/// tiny streams.
#[derive(Clone, Copy, Debug)]
pub struct DriverConfig {
    pub src_capacity: usize,
    pub dst_capacity: usize,
}

impl DriverConfig {
    /// Config with explicit capacities.
    ///
    /// # Panics
    ///
    /// Panics if either capacity is zero — a zero-capacity buffer can never
    /// hold one unit of decoder work.
    #[must_use]
    pub fn new(src_capacity: usize, dst_capacity: usize) -> Self {
        assert!(src_capacity > 0, "source capacity must be non-zero");
        assert!(dst_capacity > 0, "destination capacity must be non-zero");
        Self {
            src_capacity,
            dst_capacity,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            src_capacity: DEFAULT_SRC_CAPACITY,
            dst_capacity: DEFAULT_DST_CAPACITY,
        }
    }
}
