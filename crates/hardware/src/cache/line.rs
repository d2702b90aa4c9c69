//! Cache line entry.

/// A resident block: validity, dirty bit, the address that brought it in,
/// its tag, and an exclusively owned copy of its data.
///
/// The data buffer is released when the line is dropped, which happens
/// exactly once: either on eviction or when the owning cache is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheLine {
    valid: bool,
    dirty: bool,
    address: u32,
    tag: u32,
    data: Box<[u8]>,
}

impl CacheLine {
    /// Creates a valid line holding `data`.
    pub(crate) const fn new(address: u32, tag: u32, data: Box<[u8]>, dirty: bool) -> Self {
        Self {
            valid: true,
            dirty,
            address,
            tag,
            data,
        }
    }

    /// Whether the line holds a block.
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the line was written since it was filled.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Address of the access that allocated the line. Write-backs are sent here.
    pub const fn address(&self) -> u32 {
        self.address
    }

    /// Tag field of the resident block.
    pub const fn tag(&self) -> u32 {
        self.tag
    }

    /// Contents of the resident block.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) const fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub(crate) const fn matches(&self, tag: u32) -> bool {
        self.valid && self.tag == tag
    }
}
