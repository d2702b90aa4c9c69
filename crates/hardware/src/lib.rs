//! Set-associative cache hierarchy simulator library.
//!
//! This crate replays memory traces against a chain of caches and reports
//! hit/miss behaviour and memory traffic. It provides:
//! 1. **Cache:** Address decoding, recency-ordered sets, strict LRU eviction,
//!    write-back/write-allocate.
//! 2. **Prefetch:** A recency-ordered queue of stream buffers staging sequential blocks.
//! 3. **Hierarchy:** L1 → L2 → … chaining, with the backing store counted rather than modelled.
//! 4. **Simulation:** Configuration, trace parsing and replay, and per-level statistics.

/// Set-associative cache level (decoder, lines, sets).
pub mod cache;
/// Common types (access types, block data, errors).
pub mod common;
/// Simulator configuration (defaults, per-level and hierarchy structures).
pub mod config;
/// Chaining of cache levels in front of the backing store.
pub mod hierarchy;
/// Stream-buffer prefetching.
pub mod prefetch;
/// Trace parsing and replay.
pub mod sim;
/// Per-level statistics and derived metrics.
pub mod stats;

/// One cache level; construct with `Cache::new` or `Cache::from_config`.
pub use crate::cache::Cache;
/// Root configuration type; use `HierarchyConfig::default()` or deserialize from JSON.
pub use crate::config::HierarchyConfig;
/// Ordered chain of cache levels.
pub use crate::hierarchy::CacheHierarchy;
/// Trace-driven simulator.
pub use crate::sim::Simulator;
/// Per-level counters.
pub use crate::stats::CacheStats;
