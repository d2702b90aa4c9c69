//! Trace-driven simulation.
//!
//! Provides the trace format and the driver that replays it, one record at a
//! time, against a cache hierarchy.

/// Top-level simulator owning the hierarchy.
pub mod simulator;

/// Trace records, line parsing, and streaming reader.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{TraceReader, TraceRecord, parse_line};
