//! Configuration system for the cache simulator.
//!
//! This module defines the structures used to parameterize a hierarchy. It provides:
//! 1. **Defaults:** Baseline geometry for a single L1 without prefetching.
//! 2. **Structures:** Per-level cache configuration and the ordered hierarchy of levels.
//! 3. **Loading and Validation:** JSON deserialization and geometry checks before any
//!    cache is built.

use serde::{Deserialize, Serialize};

use crate::cache::decoder::CacheGeometry;
use crate::common::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default level name.
    pub const NAME: &str = "L1";

    /// Default cache size in bytes (1 KiB).
    pub const CACHE_SIZE: u32 = 1024;

    /// Default associativity (2-way).
    pub const ASSOCIATIVITY: u32 = 2;

    /// Default block size in bytes.
    pub const BLOCK_SIZE: u32 = 32;

    /// Default number of stream buffers (prefetching disabled).
    pub const STREAM_BUFFERS: u32 = 0;

    /// Default number of blocks staged per stream buffer.
    pub const STREAM_BUFFER_DEPTH: u32 = 4;
}

/// Configuration of one cache level.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::CacheConfig;
///
/// let json = r#"{ "name": "L2", "size_bytes": 8192, "associativity": 4, "block_bytes": 32 }"#;
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.stream_buffers, 0);
/// assert_eq!(config.stream_buffer_depth, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Label used in logs and reports.
    #[serde(default = "CacheConfig::default_name")]
    pub name: String,

    /// Capacity in bytes.
    pub size_bytes: u32,

    /// Lines per set (1 = direct-mapped).
    pub associativity: u32,

    /// Bytes per line.
    pub block_bytes: u32,

    /// Number of stream buffers (0 disables prefetching).
    #[serde(default = "CacheConfig::default_stream_buffers")]
    pub stream_buffers: u32,

    /// Blocks staged per stream buffer.
    #[serde(default = "CacheConfig::default_stream_buffer_depth")]
    pub stream_buffer_depth: u32,
}

impl CacheConfig {
    fn default_name() -> String {
        defaults::NAME.to_owned()
    }

    const fn default_stream_buffers() -> u32 {
        defaults::STREAM_BUFFERS
    }

    const fn default_stream_buffer_depth() -> u32 {
        defaults::STREAM_BUFFER_DEPTH
    }

    /// Checks the geometry without building the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Level`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let check = || -> Result<(), ConfigError> {
            let _ = CacheGeometry::new(self.size_bytes, self.associativity, self.block_bytes)?;
            if self.stream_buffers > 0 && self.stream_buffer_depth == 0 {
                return Err(ConfigError::EmptyStreamBuffers {
                    count: self.stream_buffers,
                });
            }
            Ok(())
        };
        check().map_err(|source| ConfigError::Level {
            name: self.name.clone(),
            source: Box::new(source),
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            size_bytes: defaults::CACHE_SIZE,
            associativity: defaults::ASSOCIATIVITY,
            block_bytes: defaults::BLOCK_SIZE,
            stream_buffers: defaults::STREAM_BUFFERS,
            stream_buffer_depth: defaults::STREAM_BUFFER_DEPTH,
        }
    }
}

/// Ordered cache levels, L1 first. The backing store sits below the last one.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
///
/// let json = r#"{
///     "levels": [
///         { "name": "L1", "size_bytes": 1024, "associativity": 2, "block_bytes": 16 },
///         { "name": "L2", "size_bytes": 8192, "associativity": 4, "block_bytes": 16,
///           "stream_buffers": 3, "stream_buffer_depth": 10 }
///     ]
/// }"#;
///
/// let config = HierarchyConfig::from_json(json).unwrap();
/// assert_eq!(config.levels.len(), 2);
/// assert_eq!(config.levels[1].stream_buffers, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HierarchyConfig {
    /// Cache levels from closest to the trace to closest to memory.
    pub levels: Vec<CacheConfig>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            levels: vec![CacheConfig::default()],
        }
    }
}

impl HierarchyConfig {
    /// Parses a hierarchy from JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks every level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHierarchy`] if there are no levels, or the
    /// first invalid level's error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::EmptyHierarchy);
        }
        self.levels.iter().try_for_each(CacheConfig::validate)
    }
}
