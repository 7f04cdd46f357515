/// Construction parameters for a [`crate::Fifo`].
///
/// The region itself (its length `N`) comes from the bound
/// [`crate::StorageMedium`]; this only holds the commit policy, which is
/// otherwise invisible to the allocator and chain walker.
#[derive(Debug, Clone, Copy)]
pub struct FifoConfig {
    /// Minimum interval between durability flushes, in milliseconds.
    /// `0` disables periodic flushing; the caller must flush externally
    /// (or the medium has no deferred-commit buffering at all).
    pub commit_period_ms: u64,
}

impl FifoConfig {
    /// Config with periodic commits disabled.
    pub const IMMEDIATE: Self = Self { commit_period_ms: 0 };

    /// Creates a config with the given commit period.
    #[must_use]
    pub const fn new(commit_period_ms: u64) -> Self {
        Self { commit_period_ms }
    }
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self::IMMEDIATE
    }
}
