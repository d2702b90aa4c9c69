//! Cache statistics collection.
//!
//! Each cache level owns one [`CacheStats`]; nothing is shared between
//! levels and aggregation is left to the reporting layer. It tracks:
//! 1. **Demand traffic:** Reads and writes issued to the level, and how many missed.
//! 2. **Write-backs:** Dirty victims pushed to the next level or the backing store.
//! 3. **Prefetching:** Blocks staged by the stream buffers and demand misses they absorbed.
//! 4. **Memory traffic:** Accesses that left this level for the backing store.
//!
//! Counters only ever increase.

use serde::Serialize;

/// Per-level access counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Read requests received (demand reads from above).
    pub reads: u64,
    /// Reads satisfied neither by a resident line nor by a stream buffer.
    pub read_misses: u64,
    /// Write requests received, including write-backs from the level above.
    pub writes: u64,
    /// Writes satisfied neither by a resident line nor by a stream buffer.
    pub write_misses: u64,
    /// Dirty lines evicted and pushed downwards.
    pub write_backs: u64,
    /// Blocks staged by the stream buffers.
    pub prefetches: u64,
    /// Cache misses absorbed by a stream buffer.
    pub stream_buffer_hits: u64,
    /// Accesses this level sent straight to the backing store.
    pub memory_traffic: u64,
}

impl CacheStats {
    /// Combined miss rate, `(read_misses + write_misses) / (reads + writes)`.
    ///
    /// This is the figure reported for the level that sees the trace directly.
    pub fn miss_rate(&self) -> f64 {
        ratio(self.read_misses + self.write_misses, self.reads + self.writes)
    }

    /// Demand read miss rate, `read_misses / reads`.
    ///
    /// Lower levels only see reads forwarded on misses from above, so this is
    /// the figure reported for them.
    pub fn read_miss_rate(&self) -> f64 {
        ratio(self.read_misses, self.reads)
    }

    /// Total block transfers below this level:
    /// `read_misses + write_misses + prefetches + write_backs`.
    pub const fn traffic(&self) -> u64 {
        self.read_misses + self.write_misses + self.prefetches + self.write_backs
    }

    /// Requests received, reads and writes combined.
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
