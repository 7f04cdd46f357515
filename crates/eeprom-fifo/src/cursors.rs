//! Cursor-moving operations: `pop`, `read`, `restartRead` (spec.md §4.5).
//!
//! `pop_p` and `read_p` both walk forward over used blocks; `read_p` never
//! passes `pop_p` under any sequence of calls except when a `pop` consumes
//! the very block `read_p` was sitting on, in which case both move together.

use crate::codec::BlockStatus;
use crate::error::{FifoError, FifoResult};
use crate::storage::StorageMedium;
use crate::Fifo;

impl<M: StorageMedium> Fifo<M> {
    /// Removes the oldest record, copying its payload into `dst`.
    ///
    /// On entry `*len` is the capacity of `dst`; on success it is set to the
    /// record's actual size. Fails with [`FifoError::DataBufferSmall`]
    /// without mutating anything if `dst` is too small to hold the record.
    ///
    /// # Errors
    ///
    /// [`FifoError::FifoEmpty`] if `pop_p == push_p`;
    /// [`FifoError::DataBufferSmall`] as above; propagates a header-decode
    /// error from a corrupt chain.
    pub fn pop(&mut self, dst: &mut [u8], len: &mut usize) -> FifoResult<()> {
        if self.pop_p == self.push_p {
            return Err(FifoError::FifoEmpty);
        }

        let (_, size) = self.read_header(self.pop_p)?;
        let data_size = u32::from(size);
        if data_size as usize > *len {
            return Err(FifoError::DataBufferSmall);
        }

        let payload_start = self.step(self.pop_p, 1);
        for i in 0..data_size {
            dst[i as usize] = self.read_payload_byte(self.step(payload_start, i));
        }
        *len = data_size as usize;

        self.write_header(self.pop_p, BlockStatus::Free, size);

        let span = data_size + 1;
        if self.read_p == self.pop_p {
            self.read_p = self.step(self.pop_p, span);
        }
        self.pop_p = self.step(self.pop_p, span);

        self.metrics.pops += 1;
        #[cfg(debug_assertions)]
        self.debug_verify();
        Ok(())
    }

    /// Copies the record at `read_p` into `dst` without removing it, then
    /// advances `read_p` past it.
    ///
    /// On entry `*len` is the capacity of `dst`; on success it is set to the
    /// record's actual size.
    ///
    /// # Errors
    ///
    /// [`FifoError::FifoEmpty`] if `read_p == push_p` (no unread record
    /// remains); [`FifoError::DataBufferSmall`] if `dst` is too small,
    /// without advancing `read_p`.
    pub fn read(&mut self, dst: &mut [u8], len: &mut usize) -> FifoResult<()> {
        if self.read_p == self.push_p {
            return Err(FifoError::FifoEmpty);
        }

        let (_, size) = self.read_header(self.read_p)?;
        let data_size = u32::from(size);
        if data_size as usize > *len {
            return Err(FifoError::DataBufferSmall);
        }

        let payload_start = self.step(self.read_p, 1);
        for i in 0..data_size {
            dst[i as usize] = self.read_payload_byte(self.step(payload_start, i));
        }
        *len = data_size as usize;

        self.read_p = self.step(self.read_p, data_size + 1);
        self.metrics.reads += 1;
        Ok(())
    }

    /// Rewinds `read_p` back to `pop_p`, so the next `read` returns the
    /// oldest record again.
    pub fn restart_read(&mut self) {
        self.read_p = self.pop_p;
        self.metrics.restarts += 1;
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use crate::{Fifo, FifoConfig, FifoError, RamMedium};

    fn fifo(n: usize) -> Fifo<RamMedium> {
        let mut fifo = Fifo::new(RamMedium::new(n), FifoConfig::default()).unwrap();
        fifo.format().unwrap();
        fifo
    }

    #[test]
    fn pop_on_empty_ring_fails() {
        let mut fifo = fifo(10);
        let mut dst = [0u8; 8];
        let mut len = dst.len();
        assert_eq!(fifo.pop(&mut dst, &mut len), Err(FifoError::FifoEmpty));
    }

    #[test]
    fn small_buffer_is_rejected_without_mutation() {
        let mut fifo = fifo(10);
        fifo.push(&[1, 2, 3]).unwrap();
        let pop_p_before = fifo.pop_p;
        let mut dst = [0u8; 2];
        let mut len = dst.len();
        assert_eq!(fifo.pop(&mut dst, &mut len), Err(FifoError::DataBufferSmall));
        assert_eq!(fifo.pop_p, pop_p_before);
        assert_eq!(len, 2); // untouched: caller's capacity, not overwritten
    }

    #[test]
    fn read_does_not_consume() {
        let mut fifo = fifo(10);
        fifo.push(&[9, 9]).unwrap();

        let mut dst = [0u8; 8];
        let mut len = dst.len();
        fifo.read(&mut dst, &mut len).unwrap();
        assert_eq!(&dst[..len], &[9, 9]);
        assert!(!fifo.is_empty());

        // A second read with nothing new pushed finds no unread record left.
        let mut len2 = dst.len();
        assert_eq!(fifo.read(&mut dst, &mut len2), Err(FifoError::FifoEmpty));

        let mut len3 = dst.len();
        fifo.pop(&mut dst, &mut len3).unwrap();
        assert_eq!(&dst[..len3], &[9, 9]);
    }

    #[test]
    fn restart_read_rewinds_to_pop_cursor() {
        let mut fifo = fifo(20);
        fifo.push(&[1]).unwrap();
        fifo.push(&[2]).unwrap();

        let mut dst = [0u8; 8];
        let mut len = dst.len();
        fifo.read(&mut dst, &mut len).unwrap();
        assert_eq!(dst[0], 1);

        fifo.restart_read();
        let mut len2 = dst.len();
        fifo.read(&mut dst, &mut len2).unwrap();
        assert_eq!(dst[0], 1);
    }

    #[test]
    fn pop_past_read_cursor_drags_it_forward() {
        let mut fifo = fifo(20);
        fifo.push(&[1]).unwrap();
        fifo.push(&[2]).unwrap();
        // read_p == pop_p initially; popping must move read_p along too.
        assert_eq!(fifo.read_p, fifo.pop_p);

        let mut dst = [0u8; 8];
        let mut len = dst.len();
        fifo.pop(&mut dst, &mut len).unwrap();
        assert_eq!(fifo.read_p, fifo.pop_p);

        let mut len2 = dst.len();
        fifo.read(&mut dst, &mut len2).unwrap();
        assert_eq!(dst[0], 2);
    }
}
