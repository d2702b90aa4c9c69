//! Statistics Tests.
//!
//! Derived metrics over hand-filled counters, and the JSON shape used by
//! reporting.

use cachesim_core::CacheStats;
use rstest::rstest;

fn stats() -> CacheStats {
    CacheStats {
        reads: 80,
        read_misses: 8,
        writes: 20,
        write_misses: 2,
        write_backs: 3,
        prefetches: 5,
        stream_buffer_hits: 4,
        memory_traffic: 11,
    }
}

#[test]
fn miss_rate_combines_reads_and_writes() {
    assert_eq!(stats().miss_rate(), 0.1);
}

#[test]
fn read_miss_rate_ignores_writes() {
    assert_eq!(stats().read_miss_rate(), 0.1);

    let writes_only = CacheStats {
        writes: 4,
        write_misses: 4,
        ..CacheStats::default()
    };
    assert_eq!(writes_only.read_miss_rate(), 0.0);
    assert_eq!(writes_only.miss_rate(), 1.0);
}

#[test]
fn traffic_sums_everything_sent_below() {
    assert_eq!(stats().traffic(), 8 + 2 + 5 + 3);
    assert_eq!(stats().accesses(), 100);
}

#[rstest]
#[case::empty(CacheStats::default())]
#[case::only_hits_absorbed(CacheStats {
    stream_buffer_hits: 3,
    prefetches: 4,
    ..CacheStats::default()
})]
fn rates_are_zero_without_demand(#[case] stats: CacheStats) {
    assert_eq!(stats.miss_rate(), 0.0);
    assert_eq!(stats.read_miss_rate(), 0.0);
}

#[test]
fn serializes_every_counter() {
    let value = serde_json::to_value(stats()).unwrap();
    assert_eq!(value["reads"], 80);
    assert_eq!(value["stream_buffer_hits"], 4);
    assert_eq!(value["memory_traffic"], 11);
    assert_eq!(value.as_object().unwrap().len(), 8);
}
