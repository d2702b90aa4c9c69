//! Memory Access Types and Block Data.
//!
//! This module defines the classification of memory accesses and the owned
//! byte buffers that travel between hierarchy levels. It provides:
//! 1. **Access Classification:** Distinguishing demand reads from writes in the trace and
//!    the engine.
//! 2. **Block Synthesis:** Deterministic block contents for the backing store and stream buffers.
//! 3. **Block Copies:** Independently-owned copies when a block crosses an ownership boundary.

/// Type of memory access operation.
///
/// Used to distinguish loads from stores for hit/miss accounting and for
/// the write-allocate path of the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access.
    ///
    /// Counted as a read; a miss is resolved by fetching the block.
    Read,

    /// Data write access.
    ///
    /// Counted as a write; a miss allocates the block and marks it dirty.
    Write,
}

/// Helpers for the fixed-size byte buffers owned by cache lines and stream buffers.
///
/// The simulator never models stored values. Block contents only have to be
/// stable per address so that a block can be recognised after it moves.
#[derive(Debug)]
pub struct BlockData;

impl BlockData {
    /// Generates the contents of the block starting at `base`.
    ///
    /// Every 32-bit little-endian word of the block holds its own byte address,
    /// so two synthesized copies of the same block always compare equal.
    ///
    /// # Arguments
    ///
    /// * `base` - Address of the first byte of the block.
    /// * `len` - Block size in bytes.
    pub fn synthesize(base: u32, len: usize) -> Box<[u8]> {
        let mut data = vec![0u8; len].into_boxed_slice();
        for (i, chunk) in data.chunks_mut(4).enumerate() {
            let word = base.wrapping_add((i * 4) as u32).to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
        data
    }

    /// Copies `src` into a freshly allocated buffer of `len` bytes.
    ///
    /// Only the overlapping prefix is copied; any remainder is zero-filled.
    pub fn copy_from(src: &[u8], len: usize) -> Box<[u8]> {
        let mut data = vec![0u8; len].into_boxed_slice();
        let n = len.min(src.len());
        data[..n].copy_from_slice(&src[..n]);
        data
    }

    /// Overwrites `dst` with the overlapping prefix of `src`.
    pub fn overwrite(dst: &mut [u8], src: &[u8]) {
        let n = dst.len().min(src.len());
        dst[..n].copy_from_slice(&src[..n]);
    }
}
