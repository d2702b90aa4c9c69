//! Positional geometry arguments.
//!
//! The classic invocation lists the hierarchy as seven numbers ahead of the
//! trace file:
//!
//! ```text
//! cachesim BLOCKSIZE L1_SIZE L1_ASSOC L2_SIZE L2_ASSOC PREF_N PREF_M TRACE_FILE
//! ```
//!
//! An `L2_SIZE` of zero leaves L2 out. The `PREF_N` stream buffers of
//! `PREF_M` blocks each are attached to the last configured level.

use cachesim_core::config::{CacheConfig, HierarchyConfig};

/// Argument names, in command-line order.
pub const NAMES: [&str; 7] = [
    "BLOCKSIZE", "L1_SIZE", "L1_ASSOC", "L2_SIZE", "L2_ASSOC", "PREF_N", "PREF_M",
];

/// The seven geometry numbers of the classic invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub block_size: u32,
    pub l1_size: u32,
    pub l1_assoc: u32,
    pub l2_size: u32,
    pub l2_assoc: u32,
    pub pref_n: u32,
    pub pref_m: u32,
}

impl Geometry {
    /// Parses the seven geometry arguments.
    ///
    /// # Errors
    ///
    /// Returns a usage message if the count is wrong or a value is not a
    /// non-negative integer.
    pub fn parse(values: &[String]) -> Result<Self, String> {
        if values.len() != NAMES.len() {
            return Err(format!(
                "expected {} geometry arguments ({}), found {}",
                NAMES.len(),
                NAMES.join(" "),
                values.len()
            ));
        }

        let mut numbers = [0u32; 7];
        for ((slot, name), value) in numbers.iter_mut().zip(NAMES).zip(values) {
            *slot = value
                .parse()
                .map_err(|e| format!("{name}: invalid value {value:?}: {e}"))?;
        }

        let [block_size, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m] = numbers;
        Ok(Self {
            block_size,
            l1_size,
            l1_assoc,
            l2_size,
            l2_assoc,
            pref_n,
            pref_m,
        })
    }

    /// Builds the hierarchy these arguments describe.
    pub fn to_config(&self) -> HierarchyConfig {
        let level = |name: &str, size_bytes, associativity| CacheConfig {
            name: name.to_owned(),
            size_bytes,
            associativity,
            block_bytes: self.block_size,
            stream_buffers: 0,
            stream_buffer_depth: self.pref_m,
        };

        let mut levels = vec![level("L1", self.l1_size, self.l1_assoc)];
        if self.l2_size > 0 {
            levels.push(level("L2", self.l2_size, self.l2_assoc));
        }
        if let Some(last) = levels.last_mut() {
            last.stream_buffers = self.pref_n;
        }
        HierarchyConfig { levels }
    }
}
