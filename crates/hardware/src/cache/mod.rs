//! Set-Associative Cache Simulator.
//!
//! This module implements one level of a write-back, write-allocate cache
//! with strict LRU replacement and an attached queue of stream buffers.
//! It models hits, misses, evictions, and write-backs, and forwards misses
//! to the next level of the hierarchy or, at the last level, to a backing
//! store that is only counted.
//!
//! The next level is never owned by a cache. It is lent to each operation as
//! the slice of levels below it (`lower`): the first element is the next
//! level and the rest of the slice is what that level in turn forwards to.
//! An empty slice means the backing store.

/// Address decoding and validated geometry.
pub mod decoder;

/// Cache line entry.
pub mod line;

/// Recency-ordered set.
pub mod set;

use tracing::{debug, trace};

use self::decoder::{AddressDecoder, CacheGeometry, DecodedAddress};
use self::line::CacheLine;
use self::set::CacheSet;
use crate::common::{AccessType, BlockData, ConfigError};
use crate::config::CacheConfig;
use crate::prefetch::StreamBufferQueue;
use crate::stats::CacheStats;

/// One cache level.
///
/// Geometry is fixed at construction; the set vector, the stream buffers,
/// and the counters are owned exclusively by this level.
#[derive(Clone, Debug)]
pub struct Cache {
    name: String,
    geometry: CacheGeometry,
    decoder: AddressDecoder,
    sets: Vec<CacheSet>,
    stream_buffers: StreamBufferQueue,
    stats: CacheStats,
}

impl Cache {
    /// Creates an empty cache.
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in logs and reports (e.g. `"L1"`).
    /// * `size` - Capacity in bytes.
    /// * `associativity` - Lines per set.
    /// * `block_size` - Bytes per line.
    /// * `stream_buffers` - Number of stream buffers (zero disables prefetching).
    /// * `stream_buffer_depth` - Blocks staged per stream buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the geometry is invalid or stream buffers
    /// are requested with zero depth.
    pub fn new(
        name: impl Into<String>,
        size: u32,
        associativity: u32,
        block_size: u32,
        stream_buffers: u32,
        stream_buffer_depth: u32,
    ) -> Result<Self, ConfigError> {
        let geometry = CacheGeometry::new(size, associativity, block_size)?;
        if stream_buffers > 0 && stream_buffer_depth == 0 {
            return Err(ConfigError::EmptyStreamBuffers {
                count: stream_buffers,
            });
        }

        let name = name.into();
        debug!(
            "{name}: {size} B, {associativity}-way, {block_size} B blocks, {} sets, \
             {stream_buffers} x {stream_buffer_depth} stream buffers",
            geometry.num_sets()
        );

        Ok(Self {
            name,
            decoder: AddressDecoder::new(&geometry),
            sets: (0..geometry.num_sets())
                .map(|_| CacheSet::new(associativity as usize))
                .collect(),
            stream_buffers: StreamBufferQueue::new(
                stream_buffers as usize,
                stream_buffer_depth as usize,
                block_size,
            ),
            stats: CacheStats::default(),
            geometry,
        })
    }

    /// Creates an empty cache from a level configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Level`] naming the level if it is invalid.
    pub fn from_config(config: &CacheConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.name.clone(),
            config.size_bytes,
            config.associativity,
            config.block_bytes,
            config.stream_buffers,
            config.stream_buffer_depth,
        )
        .map_err(|source| ConfigError::Level {
            name: config.name.clone(),
            source: Box::new(source),
        })
    }

    /// Label of this level.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated dimensions.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Field layout used to decode addresses.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The stream-buffer queue.
    pub const fn stream_buffers(&self) -> &StreamBufferQueue {
        &self.stream_buffers
    }

    /// Iterates the sets in index order.
    pub fn sets(&self) -> impl ExactSizeIterator<Item = &CacheSet> {
        self.sets.iter()
    }

    /// Returns the resident line holding `addr`, without touching recency.
    pub fn line(&self, addr: u32) -> Option<&CacheLine> {
        let DecodedAddress { tag, index, .. } = self.decoder.decode(addr);
        self.sets[index].find(tag)
    }

    /// Whether `addr` is resident, without touching recency.
    pub fn contains(&self, addr: u32) -> bool {
        self.line(addr).is_some()
    }

    /// Reads the block holding `addr`.
    ///
    /// A hit promotes the line to MRU. A miss is resolved from the stream
    /// buffers if one of them staged the block, otherwise from the next level
    /// (or the backing store), and the block is installed as MRU after the LRU
    /// line has been evicted from a full set.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address to read.
    /// * `lower` - The levels below this one, next level first.
    ///
    /// # Returns
    ///
    /// The resident copy of the block.
    pub fn read(&mut self, addr: u32, lower: &mut [Self]) -> &[u8] {
        self.stats.reads += 1;
        self.access(addr, AccessType::Read, lower).data()
    }

    /// Writes to the block holding `addr`.
    ///
    /// Write-back, write-allocate: a hit only marks the line dirty, a miss
    /// fills the block exactly as [`Cache::read`] would and then marks it dirty.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address to write.
    /// * `lower` - The levels below this one, next level first.
    pub fn write(&mut self, addr: u32, lower: &mut [Self]) {
        self.stats.writes += 1;
        let _ = self.access(addr, AccessType::Write, lower);
    }

    /// Accepts a dirty block evicted from the level above.
    ///
    /// A resident block is overwritten with `data` and marked dirty; an absent
    /// one is installed as a dirty MRU line and counted as a write miss. The
    /// block is not fetched from further down and the stream buffers are not
    /// consulted.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address of the evicted block.
    /// * `data` - Contents of the evicted block.
    /// * `lower` - The levels below this one, next level first.
    pub fn write_back(&mut self, addr: u32, data: &[u8], lower: &mut [Self]) {
        self.stats.writes += 1;
        let DecodedAddress { tag, index, .. } = self.decoder.decode(addr);

        if self.probe_set(index, tag, lower) {
            trace!("{}: write-back hit {addr:#010x}", self.name);
            if let Some(line) = self.sets[index].mru_mut() {
                line.mark_dirty();
                BlockData::overwrite(line.data_mut(), data);
            }
            return;
        }

        trace!("{}: write-back miss {addr:#010x}", self.name);
        self.stats.write_misses += 1;
        let data = BlockData::copy_from(data, self.geometry.block_size() as usize);
        let _ = self.sets[index].insert_mru(CacheLine::new(addr, tag, data, true));
    }

    /// Shared demand path of [`Cache::read`] and [`Cache::write`].
    fn access(&mut self, addr: u32, access: AccessType, lower: &mut [Self]) -> &mut CacheLine {
        let DecodedAddress { tag, index, .. } = self.decoder.decode(addr);
        let hit = self.probe_set(index, tag, lower);
        let staged = self.consult_stream_buffers(addr, hit);
        trace!(
            "{}: {access:?} {addr:#010x} set {index} {}",
            self.name,
            if hit { "hit" } else { "miss" }
        );

        if hit {
            let Some(line) = self.sets[index].mru_mut() else {
                unreachable!("{}: set {index} lost the line it just promoted", self.name);
            };
            // Data values are not modelled, so a write hit leaves the block as is.
            if access == AccessType::Write {
                line.mark_dirty();
            }
            return line;
        }

        let data = if let Some(data) = staged {
            self.stats.stream_buffer_hits += 1;
            data
        } else {
            match access {
                AccessType::Read => self.stats.read_misses += 1,
                AccessType::Write => self.stats.write_misses += 1,
            }
            self.fetch(addr, lower)
        };

        let dirty = access == AccessType::Write;
        self.sets[index].insert_mru(CacheLine::new(addr, tag, data, dirty))
    }

    /// Looks `tag` up in set `index`.
    ///
    /// A hit promotes the line to MRU. A miss on a full set evicts the LRU
    /// line first, writing it back if it is dirty.
    fn probe_set(&mut self, index: usize, tag: u32, lower: &mut [Self]) -> bool {
        // Index is masked to the set count, so an out-of-range index is a bug and panics here.
        let set = &mut self.sets[index];
        if set.touch(tag) {
            return true;
        }
        if set.is_full() {
            if let Some(victim) = set.evict_lru() {
                self.retire(victim, lower);
            }
        }
        false
    }

    /// Disposes of an evicted line, writing it back first if it is dirty.
    fn retire(&mut self, victim: CacheLine, lower: &mut [Self]) {
        if !victim.is_dirty() {
            return;
        }

        self.stats.write_backs += 1;
        debug!(
            "{}: writing back dirty block {:#010x}",
            self.name,
            victim.address()
        );
        match lower.split_first_mut() {
            Some((next, rest)) => next.write_back(victim.address(), victim.data(), rest),
            None => self.stats.memory_traffic += 1,
        }
    }

    /// Probes the stream buffers and extends the MRU buffer's lookahead
    /// whenever it either supplied the block or was just reseeded.
    fn consult_stream_buffers(&mut self, addr: u32, hit: bool) -> Option<Box<[u8]>> {
        if self.stream_buffers.is_empty() {
            return None;
        }

        let key = self.decoder.block_key(addr);
        let staged = self.stream_buffers.probe(key, hit);
        if staged.is_some() || !hit {
            let prefetched = u64::from(self.stream_buffers.refill_mru());
            self.stats.prefetches += prefetched;
            self.stats.memory_traffic += prefetched;
        }
        staged
    }

    /// Brings the block holding `addr` in from below.
    fn fetch(&mut self, addr: u32, lower: &mut [Self]) -> Box<[u8]> {
        let len = self.geometry.block_size() as usize;
        match lower.split_first_mut() {
            Some((next, rest)) => BlockData::copy_from(next.read(addr, rest), len),
            None => {
                self.stats.memory_traffic += 1;
                let base = self.decoder.block_base(self.decoder.block_key(addr));
                BlockData::synthesize(base, len)
            }
        }
    }
}
