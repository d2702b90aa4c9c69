//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Memory Access:** Definitions for categorizing memory operations (Read/Write).
//! 2. **Block Data:** Owned, synthetic block contents and copy helpers.
//! 3. **Error Handling:** Configuration, hierarchy, and trace error types.

/// Memory access type definitions and block data helpers.
pub mod data;

/// Error types.
pub mod error;

pub use data::{AccessType, BlockData};
pub use error::{ConfigError, HierarchyError, SimError, SimResult, TraceError};
