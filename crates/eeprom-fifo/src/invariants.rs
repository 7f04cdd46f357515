//! Debug assertion macros for the queue invariants documented in spec.md §3.
//!
//! These macros provide runtime checks that are only active in debug builds
//! (`debug_assertions`), so there is zero overhead in release builds.

// =============================================================================
// INV-3: At Least One Free Block
// =============================================================================

/// Assert that at least one free block remains in the ring.
///
/// **Invariant**: An "empty" queue is one big free run; a "full-looking"
/// queue still has one free block serving as the tail separator.
///
/// Used in: `Fifo::push` after the residual split, `Fifo::format` after tiling.
macro_rules! debug_assert_has_free_block {
    ($found_free:expr) => {
        debug_assert!($found_free, "INV-3 violated: no free block remains in the ring")
    };
}

// =============================================================================
// INV-5: bot_offset Validity
// =============================================================================

/// Assert that `bot_offset` is a valid ring-relative offset.
///
/// **Invariant**: `bot_offset` names the block that physically touches ring
/// offset 0 - either it starts there or it wraps across the ring-end boundary.
///
/// Used in: `Fifo::push` after a wrapping or ring-end-landing payload write.
macro_rules! debug_assert_bot_offset_valid {
    ($bot:expr, $r:expr) => {
        debug_assert!($bot < $r, "INV-5 violated: bot_offset {} out of range [0, {})", $bot, $r)
    };
}

// =============================================================================
// INV-4 / INV-6: read_p on the Used Run
// =============================================================================

/// Assert that `read_p` lies on the closed walk from `pop_p` (inclusive) to
/// `push_p` (exclusive), or equals `push_p` exactly when the queue is empty.
///
/// Used in: `Fifo::pop`, `Fifo::read`, `Fifo::restart_read`.
macro_rules! debug_assert_read_p_on_used_run {
    ($on_run:expr) => {
        debug_assert!($on_run, "INV-4/INV-6 violated: read_p does not lie within [pop_p, push_p)")
    };
}

// =============================================================================
// INV-1 / INV-2: Chain Closure and Non-Zero Headers
// =============================================================================

/// Assert that a chain walk (see `crate::chain::walk`) closed cleanly.
///
/// **Invariant**: starting at `bot_offset` and repeatedly advancing by
/// `span`, the walk returns to `bot_offset` after exactly `R` bytes, and no
/// header byte along the way is zero.
///
/// Used in: `Fifo::begin`, and in debug builds after every mutating op via
/// `Fifo::debug_verify`.
macro_rules! debug_assert_chain_closes {
    ($result:expr) => {
        debug_assert!($result.is_ok(), "INV-1/INV-2 violated: {:?}", $result)
    };
}

pub(crate) use debug_assert_bot_offset_valid;
pub(crate) use debug_assert_chain_closes;
pub(crate) use debug_assert_has_free_block;
pub(crate) use debug_assert_read_p_on_used_run;
