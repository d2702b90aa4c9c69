//! Cache hierarchy.
//!
//! Owns every level of a cache chain and routes trace operations to the top
//! level. Each level reaches the next one only through the slice of levels
//! below it, lent for the duration of one operation, so a level never owns
//! or outlives its successor. A miss in the last level is terminal and only
//! counted as memory traffic.

use tracing::debug;

use crate::cache::Cache;
use crate::common::{AccessType, ConfigError, HierarchyError};
use crate::config::HierarchyConfig;
use crate::stats::CacheStats;

/// An ordered chain of cache levels (L1 first) in front of a backing store.
#[derive(Clone, Debug)]
pub struct CacheHierarchy {
    top: Cache,
    lower: Vec<Cache>,
    started: bool,
}

impl CacheHierarchy {
    /// Creates a single-level hierarchy.
    pub const fn new(top: Cache) -> Self {
        Self {
            top,
            lower: Vec::new(),
            started: false,
        }
    }

    /// Builds every level described by `config`, L1 first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHierarchy`] for a configuration without
    /// levels, or the first level's geometry error.
    pub fn from_config(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        let mut levels = config.levels.iter().map(Cache::from_config);
        let top = levels.next().ok_or(ConfigError::EmptyHierarchy)??;
        Ok(Self {
            top,
            lower: levels.collect::<Result<_, _>>()?,
            started: false,
        })
    }

    /// Appends `cache` below the current last level.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::AttachAfterStart`] once any read or write has
    /// been issued, since the levels above would already hold state that the
    /// new level never observed.
    pub fn attach_next_level(&mut self, cache: Cache) -> Result<(), HierarchyError> {
        if self.started {
            return Err(HierarchyError::AttachAfterStart {
                name: cache.name().to_owned(),
            });
        }
        debug!(
            "attaching {} below {}",
            cache.name(),
            self.levels().last().map_or("", Cache::name)
        );
        self.lower.push(cache);
        Ok(())
    }

    /// Reads `addr` through the hierarchy and returns the L1 copy of its block.
    pub fn read(&mut self, addr: u32) -> &[u8] {
        self.started = true;
        self.top.read(addr, &mut self.lower)
    }

    /// Writes `addr` through the hierarchy.
    pub fn write(&mut self, addr: u32) {
        self.started = true;
        self.top.write(addr, &mut self.lower);
    }

    /// Issues one trace operation.
    pub fn access(&mut self, op: AccessType, addr: u32) {
        match op {
            AccessType::Read => {
                let _ = self.read(addr);
            }
            AccessType::Write => self.write(addr),
        }
    }

    /// Number of cache levels.
    pub fn depth(&self) -> usize {
        1 + self.lower.len()
    }

    /// Iterates the levels, L1 first.
    pub fn levels(&self) -> impl Iterator<Item = &Cache> {
        std::iter::once(&self.top).chain(&self.lower)
    }

    /// The level at `depth` (0 is L1).
    pub fn level(&self, depth: usize) -> Option<&Cache> {
        match depth {
            0 => Some(&self.top),
            n => self.lower.get(n - 1),
        }
    }

    /// Counters of the level at `depth`.
    pub fn stats(&self, depth: usize) -> Option<&CacheStats> {
        self.level(depth).map(Cache::stats)
    }

    /// Miss rate of the level at `depth`.
    ///
    /// L1 reports the combined read and write miss rate; lower levels report
    /// the demand read miss rate, since they only see reads forwarded on
    /// misses and write-backs.
    pub fn miss_rate(&self, depth: usize) -> Option<f64> {
        self.stats(depth).map(|stats| {
            if depth == 0 {
                stats.miss_rate()
            } else {
                stats.read_miss_rate()
            }
        })
    }

    /// Block transfers between the last level and the backing store.
    pub fn memory_traffic(&self) -> u64 {
        self.lower.last().unwrap_or(&self.top).stats().traffic()
    }

    /// Whether any operation has been issued yet.
    pub const fn has_started(&self) -> bool {
        self.started
    }
}
