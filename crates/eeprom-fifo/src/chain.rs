//! Chain walker: the one routine every other component builds on.
//!
//! A ring of `R` bytes is tiled exactly by a singly-linked chain of blocks,
//! starting at `bot_offset`. Walking it is the only way to recover queue
//! state from power loss (`begin`), and the only way to check the
//! universal invariants from spec.md §8 without a side-table.

use crate::codec::{self, BlockStatus};
use crate::error::{FifoError, FifoResult};
use crate::storage::StorageMedium;

/// Walks the block chain starting at `bot_offset` over a ring of `r` bytes,
/// invoking `on_block(ring_offset, status, data_size)` once per block in
/// walk order. Returns once the walk closes back to `bot_offset`.
///
/// Fails with [`FifoError::InvalidBlockHeader`] on a zero header,
/// [`FifoError::UnclosedBlockList`] if the cumulative span exceeds `r`
/// without the walk returning to `bot_offset`, or
/// [`FifoError::WrongRingBufferSize`] if the walk returns to `bot_offset`
/// but the summed spans do not equal `r` exactly.
pub fn walk<M, F>(medium: &M, bot_offset: u32, r: u32, mut on_block: F) -> FifoResult<()>
where
    M: StorageMedium + ?Sized,
    F: FnMut(u32, BlockStatus, u8),
{
    let mut p = bot_offset;
    let mut total: u32 = 0;
    loop {
        let byte = medium.read_byte(1 + p as usize);
        let (status, size) = codec::decode(byte)?;
        on_block(p, status, size);

        let len = codec::span(byte);
        total += len;
        p = codec::step(p, len, r);

        if p == bot_offset {
            break;
        }
        if total > r {
            return Err(FifoError::UnclosedBlockList);
        }
    }
    if total != r {
        return Err(FifoError::WrongRingBufferSize);
    }
    Ok(())
}

/// Cursors recovered by walking the chain from `bot_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredCursors {
    pub push_p: u32,
    pub pop_p: u32,
}

/// Reconstructs `push_p`/`pop_p` by scanning status transitions along the
/// chain (spec.md §4.6). At most one free→used and one used→free transition
/// may exist (invariant 4: a single contiguous used run); more than one of
/// either is corruption.
///
/// Also confirms invariant 3 (at least one free block exists).
pub fn recover_cursors<M>(medium: &M, bot_offset: u32, r: u32) -> FifoResult<RecoveredCursors>
where
    M: StorageMedium + ?Sized,
{
    let mut pop_p = bot_offset;
    let mut push_p = bot_offset;
    let mut prev_status: Option<BlockStatus> = None;
    let mut free_to_used = 0u32;
    let mut used_to_free = 0u32;
    let mut saw_free = false;

    walk(medium, bot_offset, r, |offset, status, _size| {
        if status == BlockStatus::Free {
            saw_free = true;
        }
        if let Some(prev) = prev_status {
            match (prev, status) {
                (BlockStatus::Free, BlockStatus::Used) => {
                    pop_p = offset;
                    free_to_used += 1;
                }
                (BlockStatus::Used, BlockStatus::Free) => {
                    push_p = offset;
                    used_to_free += 1;
                }
                _ => {}
            }
        }
        prev_status = Some(status);
    })?;

    if free_to_used > 1 || used_to_free > 1 {
        // More than one used run: the chain closes, but invariant 4 (a
        // single contiguous used run) does not hold.
        return Err(FifoError::UnclosedBlockList);
    }
    if !saw_free {
        return Err(FifoError::WrongRingBufferSize);
    }

    Ok(RecoveredCursors { push_p, pop_p })
}

/// Full invariant check (spec.md §8 properties 1-3): the chain closes, no
/// header is zero, and at least one free block exists. Used by debug
/// assertions after mutating operations and by the property-test oracle;
/// not part of the hot path.
pub fn verify_ring_has_free_block<M>(medium: &M, bot_offset: u32, r: u32) -> FifoResult<bool>
where
    M: StorageMedium + ?Sized,
{
    let mut saw_free = false;
    walk(medium, bot_offset, r, |_offset, status, _size| {
        if status == BlockStatus::Free {
            saw_free = true;
        }
    })?;
    Ok(saw_free)
}

/// Checks invariant 6 (spec.md §3): `read_p` lies on the closed walk from
/// `pop_p` (inclusive) to `push_p` (exclusive), or equals `push_p` exactly
/// when the queue is empty (`pop_p == push_p`).
///
/// Walks the used run starting at `pop_p`, stepping by span until `push_p`
/// is reached, and checks whether `read_p` was one of the offsets visited
/// along the way.
pub fn read_p_on_used_run<M>(medium: &M, pop_p: u32, push_p: u32, read_p: u32, r: u32) -> FifoResult<bool>
where
    M: StorageMedium + ?Sized,
{
    if pop_p == push_p {
        return Ok(read_p == push_p);
    }

    let mut p = pop_p;
    loop {
        if p == read_p {
            return Ok(true);
        }
        if p == push_p {
            return Ok(false);
        }
        let byte = medium.read_byte(1 + p as usize);
        let (_, size) = codec::decode(byte)?;
        p = codec::step(p, codec::span(byte), r);
        let _ = size;
    }
}
