//! Stream Buffers.
//!
//! A set of small lookahead buffers, each staging a contiguous run of block
//! keys that is expected to be demanded next. The buffers themselves form a
//! recency-ordered queue (front = LRU, back = MRU) so that the stream which
//! most recently proved useful is searched first and the stalest one is
//! recycled when a new stream starts.
//!
//! Buffers are created once with the queue and never reallocated; a
//! buffer that starts tracking a new stream is reseeded in place.

use std::collections::VecDeque;

use tracing::debug;

use crate::common::BlockData;

/// A predicted block held by a stream buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
struct StagedBlock {
    key: u32,
    data: Box<[u8]>,
}

/// One lookahead buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamBuffer {
    valid: bool,
    last_key: u32,
    entries: VecDeque<StagedBlock>,
}

impl StreamBuffer {
    /// Whether the buffer has been populated at least once.
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// The key the next refill continues from.
    pub const fn last_key(&self) -> u32 {
        self.last_key
    }

    /// Predicted block keys, oldest prediction first.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = u32> {
        self.entries.iter().map(|entry| entry.key)
    }

    /// Number of staged blocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no blocks are staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes every entry up to and including `pos` and returns a copy of
    /// the data staged at `pos`.
    fn consume_through(&mut self, pos: usize) -> Box<[u8]> {
        let data = self.entries[pos].data.clone();
        if let Some(tail) = self.entries.back() {
            self.last_key = tail.key;
        }
        self.entries.drain(..=pos).for_each(drop);
        data
    }

    /// Tops the buffer up to `capacity` with the keys following `last_key`.
    ///
    /// A buffer that is already full starts over from `last_key`.
    /// Returns the number of newly prefetched blocks.
    fn refill(&mut self, capacity: usize, offset_bits: u32) -> u32 {
        if self.entries.len() == capacity {
            self.entries.clear();
        }

        let missing = capacity - self.entries.len();
        for i in 1..=missing {
            let key = self.last_key.wrapping_add(i as u32);
            let base = key << offset_bits;
            self.entries.push_back(StagedBlock {
                key,
                data: BlockData::synthesize(base, 1 << offset_bits),
            });
        }
        self.valid = true;
        missing as u32
    }
}

/// The recency-ordered queue of stream buffers attached to one cache.
#[derive(Clone, Debug)]
pub struct StreamBufferQueue {
    buffers: VecDeque<StreamBuffer>,
    capacity: usize,
    offset_bits: u32,
}

impl StreamBufferQueue {
    /// Creates `count` empty buffers of `capacity` blocks each.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of stream buffers; zero disables prefetching.
    /// * `capacity` - Blocks staged per buffer.
    /// * `block_size` - Block size in bytes (a power of two).
    pub fn new(count: usize, capacity: usize, block_size: u32) -> Self {
        Self {
            buffers: (0..count).map(|_| StreamBuffer::default()).collect(),
            capacity,
            offset_bits: block_size.trailing_zeros(),
        }
    }

    /// Number of buffers.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the cache has no stream buffers.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Blocks staged per buffer.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates the buffers from least to most recently used.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StreamBuffer> {
        self.buffers.iter()
    }

    /// The most recently used buffer.
    pub fn mru(&self) -> Option<&StreamBuffer> {
        self.buffers.back()
    }

    /// Searches the buffers for the block `key`.
    ///
    /// Buffers are scanned from MRU to LRU and the first valid buffer staging
    /// `key` wins: its entries up to and including the match are consumed,
    /// it becomes MRU, and a copy of the staged block is returned.
    ///
    /// When nothing matches and the access also missed in the cache, the LRU
    /// buffer is reseeded at `key` and promoted so the next refill starts a
    /// new stream there. A cache hit that matches no buffer leaves the queue
    /// untouched.
    ///
    /// # Arguments
    ///
    /// * `key` - Block key (tag and index) of the access.
    /// * `cache_hit` - Whether the owning cache already holds the block.
    pub fn probe(&mut self, key: u32, cache_hit: bool) -> Option<Box<[u8]>> {
        let found = self.buffers.iter().enumerate().rev().find_map(|(i, buffer)| {
            if !buffer.valid {
                return None;
            }
            buffer
                .entries
                .iter()
                .position(|entry| entry.key == key)
                .map(|pos| (i, pos))
        });

        if let Some((i, pos)) = found {
            let mut buffer = self.buffers.remove(i)?;
            let data = buffer.consume_through(pos);
            self.buffers.push_back(buffer);
            return Some(data);
        }

        if cache_hit {
            return None;
        }
        if let Some(mut lru) = self.buffers.pop_front() {
            debug!("reseeding LRU stream buffer at block {key:#x}");
            lru.last_key = key;
            self.buffers.push_back(lru);
        }
        None
    }

    /// Extends the MRU buffer's lookahead back to full capacity.
    ///
    /// Returns the number of blocks prefetched.
    pub fn refill_mru(&mut self) -> u32 {
        let (capacity, offset_bits) = (self.capacity, self.offset_bits);
        self.buffers
            .back_mut()
            .map_or(0, |buffer| buffer.refill(capacity, offset_bits))
    }
}
