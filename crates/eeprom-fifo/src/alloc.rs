//! Allocator: `push` (spec.md §4.4).
//!
//! The only component that mutates the free/used partition of the ring.
//! Coalescing is "on paper": consecutive free blocks being absorbed into a
//! new record never have their intermediate headers rewritten, because the
//! payload write is about to overwrite them anyway - only the new record's
//! own header and the residual free header (if any) are ever written.

use crate::codec::{self, BlockStatus, MAX_DATA_SIZE};
use crate::error::{FifoError, FifoResult};
use crate::storage::StorageMedium;
use crate::Fifo;

impl<M: StorageMedium> Fifo<M> {
    /// Appends `data` as a new record at the tail of the queue.
    ///
    /// Fails with [`FifoError::PushBlockNotFree`] if `push_p` is not a free
    /// block (the region was never [`Fifo::format`]ted, or is corrupt), and
    /// with [`FifoError::FifoFull`] if no run of free blocks - including the
    /// whole ring coalesced - is large enough for the record without
    /// crossing the queue head.
    ///
    /// # Errors
    ///
    /// See above; also propagates header-decode errors from a corrupt chain.
    pub fn push(&mut self, data: &[u8]) -> FifoResult<()> {
        if data.len() > MAX_DATA_SIZE as usize {
            // No block can ever represent a record this large (the size
            // field is 7 bits), independent of how much free space the ring
            // has - the same failure mode as any other record that will
            // never fit.
            log::debug!("eeprom-fifo: rejecting {}-byte record, exceeds {MAX_DATA_SIZE}", data.len());
            return Err(FifoError::FifoFull);
        }
        let n = data.len() as u32;

        let (push_status, push_size) = self.read_header(self.push_p)?;
        if push_status != BlockStatus::Free {
            return Err(FifoError::PushBlockNotFree);
        }

        let need = n + 1;
        let mut free_run_len = u32::from(push_size) + 1;

        while need > free_run_len {
            let q = self.step(self.push_p, free_run_len);
            if q == self.push_p {
                // Every block in the ring is free and it is still not enough.
                return Err(FifoError::FifoFull);
            }
            let (q_status, q_size) = self.read_header(q)?;
            if q_status == BlockStatus::Used {
                // Coalescing further would cross the queue head.
                return Err(FifoError::FifoFull);
            }
            free_run_len += u32::from(q_size) + 1;
        }

        if need < free_run_len {
            let residual_offset = self.step(self.push_p, need);
            let residual_size = (free_run_len - need - 1) as u8;
            self.write_header(residual_offset, BlockStatus::Free, residual_size);
        } else {
            // need == free_run_len: the record consumes the whole run: the
            // block right after it must already be a free separator.
            let q = self.step(self.push_p, free_run_len);
            if q == self.push_p {
                return Err(FifoError::FifoFull);
            }
            let (q_status, _) = self.read_header(q)?;
            if q_status != BlockStatus::Free {
                return Err(FifoError::FifoFull);
            }
        }

        let payload_start = self.step(self.push_p, 1);
        for i in 0..n {
            let offset = self.step(payload_start, i);
            self.write_payload_byte(offset, data[i as usize]);
        }

        // abs_end is push_p + need without wrapping: >= r iff the payload
        // reached or crossed the ring-end boundary, in which case a new
        // bottommost block starts where the payload landed (0 exactly at
        // the boundary, otherwise the wrap landing offset).
        let abs_end = self.push_p + need;
        if abs_end >= self.r {
            self.bot_offset = abs_end - self.r;
            self.persist_bot_offset();
        }

        let record_offset = self.push_p;
        self.write_header(record_offset, BlockStatus::Used, n as u8);
        self.push_p = codec::step(record_offset, need, self.r);

        self.metrics.pushes += 1;
        #[cfg(debug_assertions)]
        self.debug_verify();
        Ok(())
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
    fn single_push_pop_matches_scenario_2() {
        let mut fifo = fifo(10); // N=10, R=9
        fifo.push(&[0xAA, 0xBB]).unwrap();
        assert_eq!(fifo.medium.as_slice()[1], 0x02); // used, size 2
        assert_eq!(fifo.medium.as_slice()[4], 0x85); // free, size 5, at ring offset 3
        assert_eq!(fifo.push_p, 3);

        let mut dst = [0u8; 16];
        let mut len = dst.len();
        fifo.pop(&mut dst, &mut len).unwrap();
        assert_eq!(len, 2);
        assert_eq!(&dst[..2], &[0xAA, 0xBB]);
        assert_eq!(fifo.pop_p, fifo.push_p);
    }

    #[test]
    fn full_ring_rejects_third_push_matches_scenario_3() {
        let mut fifo = fifo(10); // R=9
        fifo.push(&[1, 2, 3]).unwrap();
        fifo.push(&[4, 5, 6]).unwrap();
        assert_eq!(fifo.push(&[7]), Err(FifoError::FifoFull));
    }

    #[test]
    fn oversized_record_is_rejected() {
        let mut fifo = fifo(200);
        let data = [0u8; 128];
        assert_eq!(fifo.push(&data), Err(FifoError::FifoFull));
    }

    #[test]
    fn minimum_region_single_byte_record() {
        let mut fifo = fifo(5); // N=5, R=4
        fifo.push(&[0x42]).unwrap();
        assert_eq!(fifo.push(&[0x01]), Err(FifoError::FifoFull));
    }

    #[test]
    fn max_size_record_round_trips() {
        let mut fifo = fifo(130); // R=129, room for one 127-byte record
        let data: Vec<u8> = (0..127u8).collect();
        fifo.push(&data).unwrap();
        let mut dst = [0u8; 127];
        let mut len = dst.len();
        fifo.pop(&mut dst, &mut len).unwrap();
        assert_eq!(len, 127);
        assert_eq!(&dst[..], &data[..]);
    }
}
