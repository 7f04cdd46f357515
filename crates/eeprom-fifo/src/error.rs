use thiserror::Error;

/// Error taxonomy for FIFO operations.
///
/// Discriminants are stable: embedded callers treat these as an ABI, not just
/// a Rust enum, so existing variants are never renumbered or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[repr(i32)]
pub enum FifoError {
    /// `pop`/`read` called with nothing left to consume.
    #[error("fifo is empty")]
    FifoEmpty = 1,
    /// No free run (including after coalescing) is large enough for the record.
    #[error("fifo is full")]
    FifoFull = 2,
    /// `N < 5` at construction or `format` time.
    #[error("invalid fifo buffer size (N must be >= 5)")]
    InvalidFifoBufferSize = 3,
    /// A header byte of `0x00` was encountered while walking the chain.
    #[error("invalid block header (zero byte)")]
    InvalidBlockHeader = 4,
    /// Caller's destination buffer is smaller than the record about to be read.
    #[error("destination buffer too small for record")]
    DataBufferSmall = 5,
    /// `push_p` does not point at a free block; the region was never `format`ted
    /// or has been corrupted.
    #[error("block at push_p is not free")]
    PushBlockNotFree = 6,
    /// The chain walk did not return to `bot_offset` after `R` bytes of spans.
    #[error("block chain does not close back to bot_offset")]
    UnclosedBlockList = 7,
    /// The chain walk returned to `bot_offset` but the summed span did not equal `R`.
    #[error("summed block spans do not equal the ring size")]
    WrongRingBufferSize = 8,
}

impl FifoError {
    /// Stable numeric code, for embedded/FFI callers that want a raw `i32`.
    #[must_use]
    pub const fn as_code(self) -> i32 {
        self as i32
    }
}

pub type FifoResult<T> = Result<T, FifoError>;
