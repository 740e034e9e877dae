//! Checkpoint module for resumable searches
//!
//! This module provides:
//! - The fixed binary checkpoint layout
//! - Checkpoint file I/O with atomic replacement and locking

mod format;
mod store;

pub use format::{Checkpoint, Progress};
pub use store::{CheckpointStore, StoreLock, DEFAULT_CHECKPOINT};
