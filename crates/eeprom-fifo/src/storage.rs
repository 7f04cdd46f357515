//! Storage adapter: the one-byte-granularity contract the core is generic over.
//!
//! The core (block codec, chain walker, allocator, cursors) never touches a
//! concrete medium directly - it is generic over [`StorageMedium`] so the
//! same allocator runs unchanged over on-chip EEPROM, a memory-mapped flash
//! region, or a plain RAM slice in tests.

/// A byte-addressable region of fixed length `N`, read and written one byte
/// at a time.
///
/// Implementors should elide writes that do not change the stored value -
/// EEPROM and flash-backed media pay write latency and endurance cost per
/// byte actually programmed, and a no-op write should cost neither.
pub trait StorageMedium {
    /// Region length in bytes. Fixed for the medium's lifetime.
    fn len(&self) -> usize;

    /// Reads the byte at `offset`. `offset < self.len()` always holds for
    /// calls made by [`crate::Fifo`].
    fn read_byte(&self, offset: usize) -> u8;

    /// Writes `value` at `offset`. `offset < self.len()` always holds for
    /// calls made by [`crate::Fifo`].
    fn write_byte(&mut self, offset: usize, value: u8);

    /// Flushes any buffered writes to durable storage.
    ///
    /// Media with per-byte atomic commit (true EEPROM) can leave this as a
    /// no-op. Media that buffer writes in volatile RAM until flushed
    /// (emulated-EEPROM-over-flash) override it; [`crate::Fifo::commit`]
    /// calls this, throttled by the configured commit period.
    fn flush(&mut self) {}
}

/// A `StorageMedium` over a caller-owned `&mut [u8]`.
///
/// This is the `no_std` path: point it at a memory-mapped EEPROM/NVRAM
/// region with no allocation. Writes are elided when the value does not
/// change.
pub struct SliceMedium<'a> {
    region: &'a mut [u8],
}

impl<'a> SliceMedium<'a> {
    #[must_use]
    pub fn new(region: &'a mut [u8]) -> Self {
        Self { region }
    }
}

impl StorageMedium for SliceMedium<'_> {
    fn len(&self) -> usize {
        self.region.len()
    }

    fn read_byte(&self, offset: usize) -> u8 {
        self.region[offset]
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        if self.region[offset] != value {
            self.region[offset] = value;
        }
    }
}

#[cfg(feature = "std")]
mod ram {
    use super::StorageMedium;

    /// A `StorageMedium` over an owned `Vec<u8>`. Convenient for hosted
    /// tests and the simulation harness; not available without `std`.
    pub struct RamMedium {
        region: Vec<u8>,
    }

    impl RamMedium {
        /// Creates a zero-filled region of `len` bytes.
        #[must_use]
        pub fn new(len: usize) -> Self {
            Self { region: vec![0u8; len] }
        }

        /// Creates a region pre-populated with `data`, e.g. to reconstruct a
        /// medium from a snapshot taken before a simulated power cycle.
        #[must_use]
        pub fn from_bytes(data: Vec<u8>) -> Self {
            Self { region: data }
        }

        /// Borrows the raw bytes, for test assertions against the on-medium layout.
        #[must_use]
        pub fn as_slice(&self) -> &[u8] {
            &self.region
        }
    }

    impl StorageMedium for RamMedium {
        fn len(&self) -> usize {
            self.region.len()
        }

        fn read_byte(&self, offset: usize) -> u8 {
            self.region[offset]
        }

        fn write_byte(&mut self, offset: usize, value: u8) {
            if self.region[offset] != value {
                self.region[offset] = value;
            }
        }
    }
}

#[cfg(feature = "std")]
pub use ram::RamMedium;

/// A `StorageMedium` that buffers writes and only programs the underlying
/// slice on [`StorageMedium::flush`] - models emulated-EEPROM-over-flash
/// media where a crash between writes and the next flush rolls back to the
/// last flushed state (spec.md §5).
#[cfg(feature = "std")]
pub struct DeferredMedium<'a> {
    region: &'a mut [u8],
    pending: std::collections::BTreeMap<usize, u8>,
}

#[cfg(feature = "std")]
impl<'a> DeferredMedium<'a> {
    #[must_use]
    pub fn new(region: &'a mut [u8]) -> Self {
        Self { region, pending: std::collections::BTreeMap::new() }
    }

    /// Number of byte-writes buffered but not yet flushed.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(feature = "std")]
impl StorageMedium for DeferredMedium<'_> {
    fn len(&self) -> usize {
        self.region.len()
    }

    fn read_byte(&self, offset: usize) -> u8 {
        self.pending.get(&offset).copied().unwrap_or(self.region[offset])
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        if self.region[offset] != value {
            self.pending.insert(offset, value);
        }
    }

    fn flush(&mut self) {
        for (offset, value) in self.pending.iter() {
            self.region[*offset] = *value;
        }
        self.pending.clear();
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn slice_medium_elides_no_op_writes() {
        let mut buf = [0u8; 8];
        let mut medium = SliceMedium::new(&mut buf);
        medium.write_byte(0, 5);
        assert_eq!(medium.read_byte(0), 5);
        medium.write_byte(0, 5); // no-op, value unchanged
        assert_eq!(medium.read_byte(0), 5);
    }

    #[test]
    fn deferred_medium_rolls_back_on_drop_without_flush() {
        let mut buf = [0u8; 8];
        {
            let mut medium = DeferredMedium::new(&mut buf);
            medium.write_byte(0, 1);
            medium.write_byte(1, 2);
            assert_eq!(medium.read_byte(0), 1); // visible to the medium itself
            assert_eq!(medium.pending_count(), 2);
            // no flush() call before medium is dropped
        }
        assert_eq!(buf, [0u8; 8]); // underlying region untouched
    }

    #[test]
    fn deferred_medium_commits_on_flush() {
        let mut buf = [0u8; 8];
        let mut medium = DeferredMedium::new(&mut buf);
        medium.write_byte(0, 1);
        medium.write_byte(1, 2);
        medium.flush();
        assert_eq!(medium.pending_count(), 0);
        drop(medium);
        assert_eq!(&buf[..2], &[1, 2]);
    }
}
