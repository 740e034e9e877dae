//! Binary checkpoint layout
//!
//! Fixed field order, no padding, little-endian:
//!
//! | Offset     | Field        | Type          |
//! |------------|--------------|---------------|
//! | 0          | elapsed time | `f64` seconds |
//! | 8          | record count | `u16`, 0..=32 |
//! | 10         | records      | count × `u32`, ascending |
//! | 10 + 4n    | hi power     | `u8`          |
//! | 11 + 4n    | lo power     | `u8`          |
//!
//! The two position bytes are optional on read. Files without them carry no
//! cursor and restart the search from the first candidate. A `(0, 0)` pair
//! marks a search that ran to completion.

use crate::error::FormatError;
use crate::search::{PerfectRecords, SearchPosition, MAX_PERFECTS};

const ELAPSED_BYTES: usize = 8;
const COUNT_BYTES: usize = 2;
const RECORD_BYTES: usize = 4;
const POSITION_BYTES: usize = 2;

/// Where a checkpointed search continues from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// No position stored; restart the cursor, keep the records.
    Legacy,
    /// Resume at this untested candidate.
    At(SearchPosition),
    /// Every candidate has been tested.
    Complete,
}

/// Everything persisted between sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    /// Compute time across all sessions, in seconds.
    pub elapsed_secs: f64,
    pub records: PerfectRecords,
    pub progress: Progress,
}

impl Checkpoint {
    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        let position = match self.progress {
            Progress::Legacy => 0,
            Progress::At(_) | Progress::Complete => POSITION_BYTES,
        };
        ELAPSED_BYTES + COUNT_BYTES + RECORD_BYTES * self.records.len() + position
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.elapsed_secs.to_le_bytes());
        // MAX_PERFECTS bounds the record count well below u16::MAX
        out.extend_from_slice(&(self.records.len() as u16).to_le_bytes());
        for value in self.records.iter() {
            out.extend_from_slice(&value.to_le_bytes());
        }
        match self.progress {
            Progress::Legacy => {}
            Progress::At(position) => {
                out.push(position.hi_power());
                out.push(position.lo_power());
            }
            Progress::Complete => out.extend_from_slice(&[0, 0]),
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut reader = Reader::new(bytes);

        let elapsed_secs = f64::from_le_bytes(reader.take::<ELAPSED_BYTES>("elapsed time")?);
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return Err(FormatError(format!(
                "elapsed time {elapsed_secs} is not a non-negative number of seconds"
            )));
        }

        let count = u16::from_le_bytes(reader.take::<COUNT_BYTES>("record count")?) as usize;
        if count > MAX_PERFECTS {
            return Err(FormatError(format!(
                "record count {count} exceeds capacity {MAX_PERFECTS}"
            )));
        }

        let mut values = Vec::with_capacity(count);
        for index in 0..count {
            let value = u32::from_le_bytes(reader.take::<RECORD_BYTES>("perfect numbers")?);
            if let Some(&previous) = values.last() {
                if value <= previous {
                    return Err(FormatError(format!(
                        "record #{} ({value}) does not follow {previous} in ascending order",
                        index + 1
                    )));
                }
            }
            values.push(value);
        }
        let records = PerfectRecords::from_values(&values)
            .map_err(|err| FormatError(err.to_string()))?;

        let progress = match reader.remaining() {
            0 => Progress::Legacy,
            POSITION_BYTES => {
                let [hi_power, lo_power] = reader.take::<POSITION_BYTES>("search position")?;
                match (hi_power, lo_power) {
                    (0, 0) => Progress::Complete,
                    _ => SearchPosition::new(hi_power, lo_power)
                        .map(Progress::At)
                        .ok_or_else(|| {
                            FormatError(format!(
                                "search position 2^{hi_power} - 2^{lo_power} is out of range"
                            ))
                        })?,
                }
            }
            extra => {
                return Err(FormatError(format!(
                    "{extra} unexpected bytes after the perfect numbers"
                )))
            }
        };

        Ok(Self {
            elapsed_secs,
            records,
            progress,
        })
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take<const N: usize>(&mut self, field: &str) -> Result<[u8; N], FormatError> {
        let end = self.offset + N;
        let slice = self.bytes.get(self.offset..end).ok_or_else(|| {
            FormatError(format!(
                "truncated while reading {field}: need {N} bytes at offset {}, file has {}",
                self.offset,
                self.bytes.len()
            ))
        })?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.offset = end;
        Ok(out)
    }
}
