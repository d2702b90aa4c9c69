//! Error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Configuration Errors:** Invalid cache geometry detected before any access is simulated.
//! 2. **Hierarchy Errors:** Illegal changes to the level chain once a simulation is running.
//! 3. **Trace Errors:** Malformed or unreadable trace input.
//! 4. **Top-level Errors:** A single type for drivers that combine all of the above.

use std::num::ParseIntError;

use thiserror::Error;

/// Invalid cache or hierarchy configuration.
///
/// Configuration errors are fatal: a cache is never constructed from a
/// geometry that would alias addresses incorrectly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A geometry field that must be positive was zero.
    #[error("{field} must be non-zero")]
    Zero {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A geometry field that must be a power of two was not.
    #[error("{field} = {value} is not a power of two")]
    NotPowerOfTwo {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u32,
    },

    /// The cache cannot hold even a single set.
    #[error(
        "associativity {associativity} x block size {block_size} exceeds cache size {size}"
    )]
    NoSets {
        /// Total cache size in bytes.
        size: u32,
        /// Number of ways per set.
        associativity: u32,
        /// Block size in bytes.
        block_size: u32,
    },

    /// Stream buffers were requested but each would hold nothing.
    #[error("{count} stream buffers configured with zero capacity")]
    EmptyStreamBuffers {
        /// Number of stream buffers requested.
        count: u32,
    },

    /// A hierarchy needs at least one cache level.
    #[error("hierarchy must contain at least one cache level")]
    EmptyHierarchy,

    /// A specific level of a hierarchy was rejected.
    #[error("level {name}: {source}")]
    Level {
        /// Name of the rejected level.
        name: String,
        /// Why it was rejected.
        #[source]
        source: Box<ConfigError>,
    },
}

/// Illegal manipulation of the level chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// `attach_next_level` was called after the first access.
    #[error("cannot attach level {name} after the simulation has started")]
    AttachAfterStart {
        /// Name of the level that was refused.
        name: String,
    },
}

/// Errors raised while reading a memory trace.
#[derive(Error, Debug)]
pub enum TraceError {
    /// The line does not have the `<op> <address>` shape.
    #[error("line {line}: expected `<r|w> <hex address>`, found {text:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// The operation is neither a read nor a write.
    #[error("line {line}: unknown operation {op:?}")]
    UnknownOperation {
        /// 1-based line number.
        line: usize,
        /// The rejected operation token.
        op: String,
    },

    /// The address is not a 32-bit hexadecimal number.
    #[error("line {line}: invalid address {text:?}")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// The rejected address token.
        text: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },

    /// Reading the trace source failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for trace-driven simulation runs.
#[derive(Error, Debug)]
pub enum SimError {
    /// The hierarchy configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The level chain was modified illegally.
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// The trace could not be replayed.
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    /// A JSON configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A file could not be opened.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with [`SimError`].
pub type SimResult<T> = Result<T, SimError>;
