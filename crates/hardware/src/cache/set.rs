//! Recency-ordered cache set.
//!
//! Lines are kept in a deque ordered strictly by recency: the front holds
//! the least recently used line and the back the most recently used one.
//! Every hit moves exactly one line to the back and every fill appends at
//! the back, so the order is total and the victim is always the front.
//!
//! # Performance
//!
//! - `touch()`: O(W) where W is the associativity
//! - `evict_lru()`: O(1)
//! - `insert_mru()`: O(1)

use std::collections::VecDeque;

use super::line::CacheLine;

/// One set of a set-associative cache.
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: VecDeque<CacheLine>,
    associativity: usize,
}

impl CacheSet {
    pub(crate) fn new(associativity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(associativity),
            associativity,
        }
    }

    /// Number of resident lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the set holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of resident lines.
    pub const fn associativity(&self) -> usize {
        self.associativity
    }

    /// Whether the next fill must evict.
    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.associativity
    }

    /// Iterates the lines from least to most recently used.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CacheLine> {
        self.lines.iter()
    }

    /// Finds a line without changing recency.
    pub fn find(&self, tag: u32) -> Option<&CacheLine> {
        self.lines.iter().find(|line| line.matches(tag))
    }

    /// Looks up `tag` and, on a hit, promotes the line to MRU.
    ///
    /// Returns whether the tag was resident.
    pub(crate) fn touch(&mut self, tag: u32) -> bool {
        let Some(pos) = self.lines.iter().position(|line| line.matches(tag)) else {
            return false;
        };
        if let Some(line) = self.lines.remove(pos) {
            self.lines.push_back(line);
        }
        true
    }

    /// Removes and returns the LRU line.
    pub(crate) fn evict_lru(&mut self) -> Option<CacheLine> {
        self.lines.pop_front()
    }

    /// Appends `line` as MRU. The caller evicts first if the set is full.
    pub(crate) fn insert_mru(&mut self, line: CacheLine) -> &mut CacheLine {
        debug_assert!(self.lines.len() < self.associativity);
        self.lines.push_back(line);
        let mru = self.lines.len() - 1;
        &mut self.lines[mru]
    }

    /// The most recently used line.
    pub(crate) fn mru_mut(&mut self) -> Option<&mut CacheLine> {
        self.lines.back_mut()
    }
}
