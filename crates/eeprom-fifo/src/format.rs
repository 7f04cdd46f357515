//! `format` and `begin`: initialising a fresh ring, and recovering cursors
//! from a ring that already holds one (spec.md §4.6).

use crate::chain;
use crate::codec::BlockStatus;
use crate::error::{FifoError, FifoResult};
use crate::storage::StorageMedium;
use crate::Fifo;

/// Largest span a single block can cover (7-bit size field + header byte).
const MAX_SPAN: u32 = 128;

impl<M: StorageMedium> Fifo<M> {
    /// Initialises the region as a single chain of maximum-size free blocks.
    ///
    /// Writes `bot_offset = 0`, resets all cursors to 0, then tiles the ring:
    /// while more than 128 bytes remain, emits a free header with
    /// `data_size = 127` and advances by 128; the final block's
    /// `data_size` covers whatever is left (1..=128 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`FifoError::InvalidFifoBufferSize`] if `R < 4` (`N < 5`).
    pub fn format(&mut self) -> FifoResult<()> {
        if self.r < 4 {
            return Err(FifoError::InvalidFifoBufferSize);
        }

        self.bot_offset = 0;
        self.persist_bot_offset();
        self.push_p = 0;
        self.pop_p = 0;
        self.read_p = 0;

        let mut offset = 0u32;
        let mut remaining = self.r;
        while remaining > MAX_SPAN {
            self.write_header(offset, BlockStatus::Free, 127);
            offset = self.step(offset, MAX_SPAN);
            remaining -= MAX_SPAN;
        }
        let residual_size = (remaining - 1) as u8;
        self.write_header(offset, BlockStatus::Free, residual_size);

        #[cfg(debug_assertions)]
        self.debug_verify();
        Ok(())
    }

    /// Reconstructs `push_p`/`pop_p`/`read_p` by reading `bot_offset` and
    /// walking the chain from there. Safe to call repeatedly - a second
    /// `begin` on a quiescent, valid region returns the same cursor triple
    /// (spec.md §8, Idempotence).
    ///
    /// # Errors
    ///
    /// Propagates [`FifoError::InvalidBlockHeader`],
    /// [`FifoError::UnclosedBlockList`], or [`FifoError::WrongRingBufferSize`]
    /// if the chain is corrupt or the region was never `format`ted.
    pub fn begin(&mut self) -> FifoResult<()> {
        let raw_bot_offset = u32::from(self.medium.read_byte(0));
        if raw_bot_offset >= self.r {
            log::warn!(
                "eeprom-fifo: bot_offset {raw_bot_offset} out of range [0, {}); region not formatted or corrupt",
                self.r
            );
            return Err(FifoError::WrongRingBufferSize);
        }

        let cursors = chain::recover_cursors(&self.medium, raw_bot_offset, self.r).inspect_err(|err| {
            log::warn!("eeprom-fifo: begin() failed to recover a valid chain: {err}");
        })?;

        self.bot_offset = raw_bot_offset;
        self.push_p = cursors.push_p;
        self.pop_p = cursors.pop_p;
        self.read_p = cursors.pop_p;

        #[cfg(debug_assertions)]
        self.debug_verify();
        Ok(())
    }
}
