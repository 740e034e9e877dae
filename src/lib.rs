//! Resumable search for the perfect numbers that fit in 32 bits.
//!
//! Candidates are restricted to the form `2^hi - 2^lo` and each one is tested
//! by trial division up to its square root. Progress is checkpointed to a
//! small binary file so a run can be suspended and resumed later.

pub mod checkpoints;
pub mod commands;
pub mod config;
pub mod control;
pub mod error;
pub mod logging;
pub mod search;
pub mod utils;

pub use checkpoints::{Checkpoint, CheckpointStore, Progress};
pub use error::{CheckpointError, SearchError};
pub use search::{is_perfect, Outcome, Search, SearchPosition};
