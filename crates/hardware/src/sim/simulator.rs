//! Simulator: owns the cache hierarchy and replays traces against it.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use super::trace::{TraceReader, TraceRecord};
use crate::common::{SimResult, TraceError};
use crate::config::HierarchyConfig;
use crate::hierarchy::CacheHierarchy;

/// Top-level simulator: a cache hierarchy plus the number of records applied.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// The simulated cache levels.
    pub hierarchy: CacheHierarchy,
    records: u64,
}

impl Simulator {
    /// Wraps an already assembled hierarchy.
    pub const fn new(hierarchy: CacheHierarchy) -> Self {
        Self {
            hierarchy,
            records: 0,
        }
    }

    /// Builds the hierarchy described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`](crate::common::SimError::Config) if any
    /// level is invalid.
    pub fn from_config(config: &HierarchyConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::new(CacheHierarchy::from_config(config)?))
    }

    /// Applies a single record.
    pub fn step(&mut self, record: TraceRecord) {
        self.hierarchy.access(record.op, record.address);
        self.records += 1;
    }

    /// Applies records in order, stopping at the first error.
    ///
    /// # Returns
    ///
    /// The number of records applied by this call.
    ///
    /// # Errors
    ///
    /// Returns the first [`TraceError`] produced by `trace`. Records before
    /// it have already been applied.
    pub fn replay<I>(&mut self, trace: I) -> Result<u64, TraceError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        let start = self.records;
        for record in trace {
            self.step(record?);
        }
        let applied = self.records - start;
        info!("replayed {applied} trace records");
        Ok(applied)
    }

    /// Replays the trace file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a line is invalid.
    pub fn replay_file(&mut self, path: &Path) -> SimResult<u64> {
        info!("replaying {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        Ok(self.replay(TraceReader::new(reader))?)
    }

    /// Total records applied so far.
    pub const fn records(&self) -> u64 {
        self.records
    }
}
