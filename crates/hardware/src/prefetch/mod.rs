//! Hardware prefetch structures.
//!
//! This module contains the sequential-prefetch unit attached to each cache:
//! a recency-ordered queue of stream buffers that stage the blocks following
//! a missed address.

/// Stream buffers and their recency-ordered queue.
pub mod stream;

pub use self::stream::{StreamBuffer, StreamBufferQueue};
