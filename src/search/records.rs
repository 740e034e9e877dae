//! Fixed-capacity store of discovered perfect numbers

use crate::error::SearchError;

/// Slots reserved for discoveries.
///
/// Only five perfect numbers exist below 2^32 (the sixth is 8589869056), so 32
/// leaves ample headroom. The checkpoint format stores the count as a `u16`
/// and readers reject anything above this bound.
pub const MAX_PERFECTS: usize = 32;

/// Ascending list of perfect numbers found so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfectRecords {
    values: [u32; MAX_PERFECTS],
    len: usize,
}

impl PerfectRecords {
    pub fn new() -> Self {
        Self {
            values: [0; MAX_PERFECTS],
            len: 0,
        }
    }

    /// Build from an already-ascending slice, as read back from a checkpoint.
    pub fn from_values(values: &[u32]) -> Result<Self, SearchError> {
        let mut records = Self::new();
        for &value in values {
            records.insert(value)?;
        }
        Ok(records)
    }

    /// Record a discovery, keeping ascending order.
    ///
    /// Returns `Ok(false)` if the value was already recorded, which happens
    /// when a search restarts below numbers it found in an earlier session.
    pub fn insert(&mut self, value: u32) -> Result<bool, SearchError> {
        let slot = match self.as_slice().binary_search(&value) {
            Ok(_) => return Ok(false),
            Err(slot) => slot,
        };
        if self.len == MAX_PERFECTS {
            return Err(SearchError::CapacityExceeded {
                capacity: MAX_PERFECTS,
                value,
            });
        }
        self.values.copy_within(slot..self.len, slot + 1);
        self.values[slot] = value;
        self.len += 1;
        Ok(true)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.as_slice().binary_search(&value).is_ok()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.as_slice().iter().copied()
    }
}

impl Default for PerfectRecords {
    fn default() -> Self {
        Self::new()
    }
}
