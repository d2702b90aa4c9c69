//! Shared test infrastructure for cache simulator tests.


pub use harness::*;
