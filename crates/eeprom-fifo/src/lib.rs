//! A persistent FIFO queue of variable-size binary records over a
//! byte-addressable storage region - on-chip EEPROM, memory-mapped flash, or
//! emulated RAM.
//!
//! The whole queue lives in the region itself: one anchor byte
//! (`bot_offset`) plus a cyclic chain of blocks, each a one-byte header
//! (free/used status + 7-bit size) followed by its payload. Volatile
//! cursors (`push_p`, `pop_p`, `read_p`) are reconstructed from a single
//! scan on [`Fifo::begin`], so the queue survives power loss with no extra
//! persisted state.
//!
//! # Example
//!
//! ```
//! use eeprom_fifo::{Fifo, FifoConfig, SliceMedium};
//!
//! let mut region = [0u8; 16];
//! let medium = SliceMedium::new(&mut region);
//! let mut fifo = Fifo::new(medium, FifoConfig::default()).unwrap();
//! fifo.format().unwrap();
//!
//! fifo.push(b"hi").unwrap();
//! let mut out = [0u8; 16];
//! let mut len = out.len();
//! fifo.pop(&mut out, &mut len).unwrap();
//! assert_eq!(&out[..len], b"hi");
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

mod alloc;
mod chain;
mod codec;
mod config;
mod cursors;
mod error;
mod format;
mod invariants;
mod metrics;
mod storage;

pub use codec::MAX_DATA_SIZE;
pub use config::FifoConfig;
pub use error::{FifoError, FifoResult};
pub use metrics::Metrics;
pub use storage::{SliceMedium, StorageMedium};

#[cfg(feature = "std")]
pub use storage::{DeferredMedium, RamMedium};

/// A persistent FIFO queue bound to a [`StorageMedium`] of length `N`.
///
/// Byte 0 of the medium is the anchor (`bot_offset`); bytes `[1, N)` form
/// the ring of `R = N - 1` bytes tiled by the block chain. `push_p`,
/// `pop_p`, and `read_p` are ring-relative offsets kept only in RAM -
/// [`Fifo::begin`] reconstructs them after a restart.
pub struct Fifo<M: StorageMedium> {
    medium: M,
    /// Ring size `R = N - 1`, in bytes.
    r: u32,
    /// Anchor value: offset of the block touching ring position 0.
    bot_offset: u32,
    /// First free block (the tail sentinel).
    push_p: u32,
    /// Oldest used block (the head), or `== push_p` iff empty.
    pop_p: u32,
    /// Non-destructive read cursor, within `[pop_p, push_p)` or `== push_p`.
    read_p: u32,
    commit_period_ms: u64,
    next_commit_ms: u64,
    metrics: Metrics,
}

/// A snapshot of a [`Fifo`]'s volatile cursors, for tests, logging, and the
/// simulation harness (spec.md §9 Design Notes: "an observational accessor
/// exposing `(region_slice, cursors)` for tests and logs").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    pub bot_offset: u32,
    pub push_p: u32,
    pub pop_p: u32,
    pub read_p: u32,
}

/// Smallest region size the format supports: one anchor byte plus a ring
/// of at least 4 bytes (spec.md §4.6).
const MIN_REGION_LEN: usize = 5;

/// Largest region size the format supports: `bot_offset` is itself a single
/// persisted byte, so the ring it addresses can span at most 256 offsets.
const MAX_RING_LEN: u32 = 256;

impl<M: StorageMedium> Fifo<M> {
    /// Binds a FIFO to a storage medium without touching its contents.
    ///
    /// Call [`Fifo::format`] to initialise a fresh region, or [`Fifo::begin`]
    /// to recover cursors from a region already holding a valid chain.
    ///
    /// # Errors
    ///
    /// Returns [`FifoError::InvalidFifoBufferSize`] if `medium.len() < 5` or
    /// if the resulting ring would be too large for the one-byte
    /// `bot_offset` anchor to address (`N > 257`).
    pub fn new(medium: M, config: FifoConfig) -> FifoResult<Self> {
        let n = medium.len();
        if n < MIN_REGION_LEN {
            return Err(FifoError::InvalidFifoBufferSize);
        }
        let r = u32::try_from(n - 1).map_err(|_| FifoError::InvalidFifoBufferSize)?;
        if r > MAX_RING_LEN {
            return Err(FifoError::InvalidFifoBufferSize);
        }

        Ok(Self {
            medium,
            r,
            bot_offset: 0,
            push_p: 0,
            pop_p: 0,
            read_p: 0,
            commit_period_ms: config.commit_period_ms,
            next_commit_ms: 0,
            metrics: Metrics::new(),
        })
    }

    /// Ring size `R = N - 1`.
    #[must_use]
    pub const fn ring_len(&self) -> u32 {
        self.r
    }

    /// `true` once `push_p == pop_p`: no used blocks remain.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.push_p == self.pop_p
    }

    /// A snapshot of the running counters (spec.md ambient stack; not part
    /// of the queue's on-medium state).
    #[must_use]
    pub const fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Current volatile cursor values, for tests, logging, and simulation
    /// harnesses that need to inspect queue state without reaching into the
    /// medium directly.
    #[must_use]
    pub const fn cursors(&self) -> Cursors {
        Cursors {
            bot_offset: self.bot_offset,
            push_p: self.push_p,
            pop_p: self.pop_p,
            read_p: self.read_p,
        }
    }

    /// Borrows the bound medium, for tests and diagnostics that need to
    /// inspect raw bytes (e.g. dumping the region alongside `cursors()`).
    #[must_use]
    pub const fn medium(&self) -> &M {
        &self.medium
    }

    /// Flushes buffered writes if the medium defers commits and the
    /// configured period has elapsed.
    ///
    /// `commit_period_ms == 0` (the default) disables periodic flushing -
    /// the caller is responsible for calling [`StorageMedium::flush`]
    /// directly, or the medium has no deferred-write buffering at all.
    /// `now_ms` is a caller-supplied monotonic clock; this type has no
    /// notion of time on its own.
    pub fn commit(&mut self, now_ms: u64) {
        if self.commit_period_ms == 0 {
            return;
        }
        if now_ms >= self.next_commit_ms {
            log::trace!("eeprom-fifo: flushing medium at t={now_ms}");
            self.medium.flush();
            self.next_commit_ms = now_ms + self.commit_period_ms;
            self.metrics.flushes += 1;
        }
    }

    /// Absolute medium offset of the header byte for ring-relative offset `p`.
    #[inline]
    fn header_offset(&self, p: u32) -> usize {
        1 + p as usize
    }

    #[inline]
    fn read_header(&self, p: u32) -> FifoResult<(codec::BlockStatus, u8)> {
        codec::decode(self.medium.read_byte(self.header_offset(p)))
    }

    #[inline]
    fn write_header(&mut self, p: u32, status: codec::BlockStatus, data_size: u8) {
        let byte = codec::encode(status, data_size);
        let offset = self.header_offset(p);
        self.medium.write_byte(offset, byte);
        self.metrics.bytes_written += 1;
    }

    #[inline]
    fn read_payload_byte(&self, p: u32) -> u8 {
        self.medium.read_byte(self.header_offset(p))
    }

    #[inline]
    fn write_payload_byte(&mut self, p: u32, value: u8) {
        let offset = self.header_offset(p);
        self.medium.write_byte(offset, value);
        self.metrics.bytes_written += 1;
    }

    #[inline]
    fn step(&self, p: u32, len: u32) -> u32 {
        codec::step(p, len, self.r)
    }

    /// Writes `bot_offset` to the anchor byte.
    fn persist_bot_offset(&mut self) {
        debug_assert!(self.bot_offset < self.r);
        let value = self.bot_offset as u8;
        self.medium.write_byte(0, value);
        self.metrics.bytes_written += 1;
    }

    /// Debug-only full invariant check (spec.md §3, invariants 1-6), run
    /// after every mutating op. Compiled out entirely in release builds.
    #[cfg(debug_assertions)]
    fn debug_verify(&self) {
        invariants::debug_assert_bot_offset_valid!(self.bot_offset, self.r);

        let result = chain::verify_ring_has_free_block(&self.medium, self.bot_offset, self.r);
        invariants::debug_assert_chain_closes!(result);
        if let Ok(has_free) = result {
            invariants::debug_assert_has_free_block!(has_free);
        }

        let on_run = chain::read_p_on_used_run(&self.medium, self.pop_p, self.push_p, self.read_p, self.r);
        if let Ok(on_run) = on_run {
            invariants::debug_assert_read_p_on_used_run!(on_run);
        }
    }
}
