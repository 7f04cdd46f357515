/// Optional counters for monitoring a [`crate::Fifo`] instance.
///
/// Cheap to keep around (plain integers, no atomics - the whole system is
/// single-threaded per spec.md §5) and useful for wear/throughput
/// observability on constrained devices where nothing else is watching.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics {
    pub pushes: u64,
    pub pops: u64,
    pub reads: u64,
    pub restarts: u64,
    /// Byte-writes issued to the medium. The medium itself may elide
    /// no-op writes beneath this count, so this is an upper bound on wear,
    /// not an exact count of bytes actually programmed.
    pub bytes_written: u64,
    /// Number of times `commit` actually flushed (vs. was throttled).
    pub flushes: u64,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
