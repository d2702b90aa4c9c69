//! Set-Associative Cache Unit Tests.
//!
//! Exercises a single cache level in front of the backing store (an empty
//! `lower` slice): cold misses, warm hits, conflict eviction in strict LRU
//! order, write-back/write-allocate, and write-backs arriving from above.

use cachesim_core::Cache;
use cachesim_core::common::ConfigError;
use cachesim_core::config::CacheConfig;
use pretty_assertions::assert_eq;

use crate::common::{block, cache, set_tags};

// ══════════════════════════════════════════════════════════
// 1. Cold miss / warm hit
// ══════════════════════════════════════════════════════════

/// Reading the same address twice misses once and returns the same block twice.
#[test]
fn miss_then_hit_returns_same_block() {
    let mut l1 = cache("L1", 1024, 2, 32);

    let first = l1.read(0x1000, &mut []).to_vec();
    let second = l1.read(0x1000, &mut []).to_vec();

    assert_eq!(first, second);
    assert_eq!(first, block(0x1000, 32));
    assert_eq!(l1.stats().reads, 2);
    assert_eq!(l1.stats().read_misses, 1);
    assert_eq!(l1.stats().memory_traffic, 1, "only the cold miss leaves the cache");
}

/// Any offset inside a resident block hits.
#[test]
fn same_block_different_offset_hits() {
    let mut l1 = cache("L1", 1024, 2, 32);

    let _ = l1.read(0x1000, &mut []);
    let _ = l1.read(0x101f, &mut []);

    assert_eq!(l1.stats().read_misses, 1);
}

// ══════════════════════════════════════════════════════════
// 2. Conflicts and LRU
// ══════════════════════════════════════════════════════════

/// Direct-mapped, two sets of 64 B: 0 and 128 share set 0 and evict each other.
#[test]
fn direct_mapped_conflict_evicts() {
    let mut l1 = cache("L1", 128, 1, 64);

    for addr in [0, 128, 0] {
        let _ = l1.read(addr, &mut []);
    }

    assert_eq!(l1.stats().reads, 3);
    assert_eq!(l1.stats().read_misses, 3);
}

/// 0 and 64 land in different sets of the same cache, so the re-read hits.
#[test]
fn direct_mapped_distinct_sets_do_not_conflict() {
    let mut l1 = cache("L1", 128, 1, 64);

    for addr in [0, 64, 0] {
        let _ = l1.read(addr, &mut []);
    }

    assert_eq!(l1.stats().read_misses, 2);
}

/// One 4-way set holds four distinct blocks; revisiting the first one hits.
#[test]
fn four_way_set_holds_four_blocks() {
    let mut l1 = cache("L1", 128, 4, 32);

    for addr in [0, 32, 64, 96, 0] {
        let _ = l1.read(addr, &mut []);
    }

    assert_eq!(l1.stats().reads, 5);
    assert_eq!(l1.stats().read_misses, 4);
    assert_eq!(set_tags(&l1, 0), vec![1, 2, 3, 0]);
}

/// Touching a line protects it: the untouched line is the one evicted.
#[test]
fn eviction_picks_least_recently_used() {
    let mut l1 = cache("L1", 64, 2, 32);

    for addr in [0, 32, 0, 64] {
        let _ = l1.read(addr, &mut []);
    }

    assert!(l1.contains(0));
    assert!(!l1.contains(32));
    assert!(l1.contains(64));
    assert_eq!(set_tags(&l1, 0), vec![0, 2]);
}

/// Peeking at a line does not change recency.
#[test]
fn line_lookup_does_not_promote() {
    let mut l1 = cache("L1", 64, 2, 32);

    let _ = l1.read(0, &mut []);
    let _ = l1.read(32, &mut []);
    assert!(l1.line(0).is_some());
    let _ = l1.read(64, &mut []);

    assert!(!l1.contains(0), "block 0 was still LRU and must be evicted");
}

/// Sets never grow past the associativity.
#[test]
fn occupancy_is_bounded_by_associativity() {
    let mut l1 = cache("L1", 256, 2, 32);

    for i in 0..64 {
        let _ = l1.read(i * 32, &mut []);
    }

    assert!(l1.sets().all(|set| set.len() == 2));
    assert_eq!(l1.sets().len(), 4);
}

// ══════════════════════════════════════════════════════════
// 3. Writes
// ══════════════════════════════════════════════════════════

/// A write hit marks the line dirty and is not a miss.
#[test]
fn write_hit_marks_dirty() {
    let mut l1 = cache("L1", 1024, 2, 32);

    let _ = l1.read(0x40, &mut []);
    l1.write(0x44, &mut []);

    let stats = l1.stats();
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.write_misses, 0);
    assert!(l1.line(0x40).unwrap().is_dirty());
    assert_eq!(l1.line(0x40).unwrap().data(), &block(0x40, 32)[..]);
}

/// A write miss allocates: the block is fetched, installed, and dirty.
#[test]
fn write_miss_allocates_dirty_line() {
    let mut l1 = cache("L1", 1024, 2, 32);

    l1.write(0x40, &mut []);

    let stats = l1.stats();
    assert_eq!(stats.write_misses, 1);
    assert_eq!(stats.memory_traffic, 1, "write-allocate fetches the block");
    assert!(l1.line(0x40).unwrap().is_dirty());
}

/// Evicting a dirty line is one write-back; the last level counts it as traffic.
#[test]
fn dirty_eviction_writes_back_to_memory() {
    let mut l1 = cache("L1", 64, 1, 32);

    l1.write(0, &mut []);
    let _ = l1.read(64, &mut []);

    let stats = l1.stats();
    assert_eq!(stats.write_backs, 1);
    assert_eq!(stats.memory_traffic, 3, "two fetches and one write-back");
    assert_eq!(stats.traffic(), 3);
}

/// Clean victims are dropped without a write-back.
#[test]
fn clean_eviction_is_silent() {
    let mut l1 = cache("L1", 64, 1, 32);

    let _ = l1.read(0, &mut []);
    let _ = l1.read(64, &mut []);

    assert_eq!(l1.stats().write_backs, 0);
}

// ══════════════════════════════════════════════════════════
// 4. Write-backs from above
// ══════════════════════════════════════════════════════════

/// A block the level never saw is installed dirty and counted as a write miss.
#[test]
fn write_back_miss_installs_dirty_line() {
    let mut l2 = cache("L2", 256, 2, 32);
    let data = vec![0xaa; 32];

    l2.write_back(0x40, &data, &mut []);

    let stats = l2.stats();
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.write_misses, 1);
    assert_eq!(stats.read_misses, 0);
    assert_eq!(stats.memory_traffic, 0, "the block is not fetched");

    let line = l2.line(0x40).unwrap();
    assert!(line.is_dirty());
    assert_eq!(line.data(), &data[..]);
}

/// A resident block is overwritten in place.
#[test]
fn write_back_hit_overwrites_resident_line() {
    let mut l2 = cache("L2", 256, 2, 32);
    let data = vec![0x55; 32];

    let _ = l2.read(0x40, &mut []);
    l2.write_back(0x40, &data, &mut []);

    let stats = l2.stats();
    assert_eq!(stats.write_misses, 0);
    assert_eq!(stats.read_misses, 1);
    let line = l2.line(0x40).unwrap();
    assert!(line.is_dirty());
    assert_eq!(line.data(), &data[..]);
}

/// A write-back hit promotes the line like any other access.
#[test]
fn write_back_hit_promotes_line() {
    let mut l2 = cache("L2", 64, 2, 32);

    let _ = l2.read(0, &mut []);
    let _ = l2.read(32, &mut []);
    l2.write_back(0, &block(0, 32), &mut []);
    let _ = l2.read(64, &mut []);

    assert!(l2.contains(0));
    assert!(!l2.contains(32));
}

// ══════════════════════════════════════════════════════════
// 5. Construction
// ══════════════════════════════════════════════════════════

/// Stream buffers with no capacity are a configuration error.
#[test]
fn zero_depth_stream_buffers_are_rejected() {
    let err = Cache::new("L1", 1024, 2, 32, 2, 0).unwrap_err();
    assert_eq!(err, ConfigError::EmptyStreamBuffers { count: 2 });
}

/// Errors from a level configuration name the level.
#[test]
fn from_config_names_the_rejected_level() {
    let config = CacheConfig {
        name: "L2".into(),
        size_bytes: 1000,
        ..CacheConfig::default()
    };

    let err = Cache::from_config(&config).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Level {
            name: "L2".into(),
            source: Box::new(ConfigError::NotPowerOfTwo {
                field: "size",
                value: 1000,
            }),
        }
    );
    assert_eq!(err.to_string(), "level L2: size = 1000 is not a power of two");
}
