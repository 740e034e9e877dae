//! Candidate generation
//!
//! Every perfect number below 2^32 has the form `2^hi - 2^lo`, so the search
//! walks the `(hi, lo)` plane instead of every integer. Within one `hi` band
//! `lo` descends from `hi - 1` to `1`, which makes candidate values ascend, and
//! every band starts above the previous band's maximum. The whole sequence is
//! therefore strictly increasing.

use std::fmt;

/// Exponent bound: `hi` must stay below the width of the candidate type.
pub const POWER_LIMIT: u8 = 32;

/// Lowest `hi` band the search visits.
pub const MIN_HI_POWER: u8 = 3;

/// Resumable cursor into the candidate sequence.
///
/// Invariant: `0 < lo_power < hi_power < 32` and `hi_power >= 3`. The candidate value is always
/// derived from the two exponents and never stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchPosition {
    hi_power: u8,
    lo_power: u8,
}

impl SearchPosition {
    /// The earliest position the search considers (candidate 4).
    pub const FIRST: SearchPosition = SearchPosition {
        hi_power: MIN_HI_POWER,
        lo_power: MIN_HI_POWER - 1,
    };

    /// Build a position, rejecting exponent pairs that break the invariant.
    pub fn new(hi_power: u8, lo_power: u8) -> Option<Self> {
        let hi_in_range = (MIN_HI_POWER..POWER_LIMIT).contains(&hi_power);
        if hi_in_range && lo_power > 0 && lo_power < hi_power {
            Some(Self { hi_power, lo_power })
        } else {
            None
        }
    }

    pub fn hi_power(&self) -> u8 {
        self.hi_power
    }

    pub fn lo_power(&self) -> u8 {
        self.lo_power
    }

    /// The candidate under test: `2^hi - 2^lo`.
    pub fn value(&self) -> u32 {
        (1u32 << self.hi_power) - (1u32 << self.lo_power)
    }

    /// Largest divisor worth trying for the current candidate.
    pub fn max_divisor(&self) -> u16 {
        max_divisor(self.value())
    }

    /// Step to the next candidate, or `None` once every `hi` band below 32 has
    /// been visited.
    pub fn advance(self) -> Option<Self> {
        if self.lo_power > 1 {
            return Some(Self {
                hi_power: self.hi_power,
                lo_power: self.lo_power - 1,
            });
        }

        let hi_power = self.hi_power + 1;
        if hi_power >= POWER_LIMIT {
            return None;
        }
        Some(Self {
            hi_power,
            lo_power: hi_power - 1,
        })
    }

    /// Number of candidates left to test, this one included.
    pub fn remaining(&self) -> u32 {
        let in_band = u32::from(self.lo_power);
        let later_bands: u32 = (u32::from(self.hi_power) + 1..u32::from(POWER_LIMIT))
            .map(|hi| hi - 1)
            .sum();
        in_band + later_bands
    }
}

impl fmt::Display for SearchPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (2^{} - 2^{})",
            self.value(),
            self.hi_power,
            self.lo_power
        )
    }
}

/// Where to start: a saved position is resumed exactly, otherwise the search
/// begins at [`SearchPosition::FIRST`].
pub fn initialize(start: Option<SearchPosition>) -> SearchPosition {
    start.unwrap_or(SearchPosition::FIRST)
}

/// `floor(sqrt(value))`, which always fits in 16 bits for a 32-bit value.
pub fn max_divisor(value: u32) -> u16 {
    let value = u64::from(value);
    let mut root = (value as f64).sqrt() as u64;
    // Float rounding can land one off near perfect squares.
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root as u16
}
