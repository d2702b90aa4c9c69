//! Simulation driver tests.


/// Trace line parsing.
pub mod trace;
