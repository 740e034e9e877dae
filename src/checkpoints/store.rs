//! Checkpoint file I/O
//!
//! Saves go to a temporary file in the checkpoint's directory which is synced
//! and then renamed over the target, so a failed save never damages the
//! previous checkpoint. A running search additionally holds an `fs2`
//! advisory lock on `<checkpoint>.lock`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::format::Checkpoint;
use crate::error::CheckpointError;

/// File name the original program used, kept so old checkpoints are found.
pub const DEFAULT_CHECKPOINT: &str = "PerfectNumbers.dat";

/// Owner of one checkpoint file.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

/// Exclusive hold on a checkpoint; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Flush the directory entry so the rename survives a crash. Best effort.
    fn sync_parent(&self) {
        let parent = self.parent_dir();
        if let Err(err) = File::open(&parent).and_then(|dir| dir.sync_all()) {
            debug!(path = %parent.display(), error = %err, "directory sync skipped");
        }
    }

    /// Take the advisory lock without blocking.
    pub fn lock(&self) -> Result<StoreLock, CheckpointError> {
        let path = self.lock_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| CheckpointError::WriteFailure {
                path: path.clone(),
                source,
            })?;
        if FileExt::try_lock_exclusive(&file).is_err() {
            return Err(CheckpointError::Locked {
                path: self.path.clone(),
            });
        }
        debug!(path = %path.display(), "checkpoint lock acquired");
        Ok(StoreLock { file })
    }

    /// Read the checkpoint, or `Ok(None)` if none has been written yet.
    pub fn load(&self) -> Result<Option<Checkpoint>, CheckpointError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no checkpoint file");
                return Ok(None);
            }
            Err(source) => {
                return Err(CheckpointError::Unavailable {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let checkpoint = Checkpoint::decode(&bytes).map_err(|err| err.at(&self.path))?;
        info!(
            path = %self.path.display(),
            records = checkpoint.records.len(),
            progress = ?checkpoint.progress,
            "checkpoint loaded"
        );
        Ok(Some(checkpoint))
    }

    /// Write `checkpoint`, replacing any previous file atomically.
    pub fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let write_failure = |source: io::Error| CheckpointError::WriteFailure {
            path: self.path.clone(),
            source,
        };

        let bytes = checkpoint.encode();
        let mut staging = NamedTempFile::new_in(self.parent_dir()).map_err(write_failure)?;
        staging.write_all(&bytes).map_err(write_failure)?;
        staging.as_file().sync_all().map_err(write_failure)?;
        staging
            .persist(&self.path)
            .map_err(|err| write_failure(err.error))?;
        self.sync_parent();

        info!(
            path = %self.path.display(),
            bytes = bytes.len(),
            records = checkpoint.records.len(),
            "checkpoint saved"
        );
        Ok(())
    }
}
