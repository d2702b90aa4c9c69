//! Address Decoding.
//!
//! Splits a 32-bit address into its tag, index, and offset fields:
//!
//! ```text
//! 31                                    0
//! +-----------------+---------+----------+
//! |       tag       |  index  |  offset  |
//! +-----------------+---------+----------+
//!                    index_bits offset_bits
//! ```
//!
//! The field widths are derived once from a validated [`CacheGeometry`];
//! decoding is then pure mask-and-shift arithmetic.

use crate::common::ConfigError;

/// Validated cache dimensions.
///
/// Size, associativity, and block size are non-zero powers of two, so the
/// number of sets is a power of two as well and every address maps to
/// exactly one set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheGeometry {
    size: u32,
    associativity: u32,
    block_size: u32,
    num_sets: u32,
}

impl CacheGeometry {
    /// Validates a cache geometry.
    ///
    /// # Arguments
    ///
    /// * `size` - Total capacity in bytes.
    /// * `associativity` - Lines per set.
    /// * `block_size` - Bytes per line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any field is zero or not a power of two,
    /// or if a single set (`associativity * block_size`) does not fit in `size`.
    pub fn new(size: u32, associativity: u32, block_size: u32) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("size", size),
            ("associativity", associativity),
            ("block size", block_size),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
            if !value.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo { field, value });
            }
        }

        let set_bytes = u64::from(associativity) * u64::from(block_size);
        if set_bytes > u64::from(size) {
            return Err(ConfigError::NoSets {
                size,
                associativity,
                block_size,
            });
        }

        Ok(Self {
            size,
            associativity,
            block_size,
            num_sets: (u64::from(size) / set_bytes) as u32,
        })
    }

    /// Total capacity in bytes.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Lines per set.
    pub const fn associativity(&self) -> u32 {
        self.associativity
    }

    /// Bytes per line.
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Number of sets (`size / (associativity * block_size)`).
    pub const fn num_sets(&self) -> u32 {
        self.num_sets
    }
}

/// The three fields of a decoded address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// Identifies the block among those sharing a set.
    pub tag: u32,
    /// Selects the set.
    pub index: usize,
    /// Byte position within the block.
    pub offset: u32,
}

/// Precomputed field widths and masks for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
    offset_mask: u32,
    index_mask: u32,
}

impl AddressDecoder {
    /// Derives the field layout for `geometry`.
    pub const fn new(geometry: &CacheGeometry) -> Self {
        let offset_bits = geometry.block_size.trailing_zeros();
        let index_bits = geometry.num_sets.trailing_zeros();
        Self {
            offset_bits,
            index_bits,
            offset_mask: geometry.block_size - 1,
            index_mask: geometry.num_sets - 1,
        }
    }

    /// Number of offset bits (`log2(block_size)`).
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of index bits (`log2(num_sets)`).
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Splits `addr` into tag, index, and offset.
    #[inline]
    pub const fn decode(&self, addr: u32) -> DecodedAddress {
        let tag_shift = self.offset_bits + self.index_bits;
        DecodedAddress {
            tag: match addr.checked_shr(tag_shift) {
                Some(tag) => tag,
                None => 0,
            },
            index: ((addr >> self.offset_bits) & self.index_mask) as usize,
            offset: addr & self.offset_mask,
        }
    }

    /// Returns the combined tag and index of `addr`, i.e. its block number.
    ///
    /// Stream buffers track blocks by this key.
    #[inline]
    pub const fn block_key(&self, addr: u32) -> u32 {
        addr >> self.offset_bits
    }

    /// Returns the address of the first byte of the block identified by `key`.
    #[inline]
    pub const fn block_base(&self, key: u32) -> u32 {
        key << self.offset_bits
    }
}
