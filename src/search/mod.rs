//! Perfect number search
//!
//! This module provides:
//! - Candidate generation over values of the form `2^hi - 2^lo`
//! - The trial-division perfection test
//! - Fixed-capacity storage for discoveries
//! - The resumable search loop

pub mod engine;
pub mod position;
pub mod records;
pub mod stopwatch;
pub mod tester;

pub use engine::{Discovery, Flow, Operator, Outcome, Search, Step};
pub use position::{initialize, max_divisor, SearchPosition};
pub use records::{PerfectRecords, MAX_PERFECTS};
pub use stopwatch::Stopwatch;
pub use tester::{divisor_sum, is_perfect};
