//! Search configuration
//!
//! Settings come from an optional `perfects.toml` and are overridden by
//! command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::checkpoints::DEFAULT_CHECKPOINT;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "perfects.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Checkpoint file location
    pub checkpoint: PathBuf,
    /// Ring the terminal bell on each discovery
    pub bell: bool,
    /// Save a checkpoint this often while searching
    pub autosave_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checkpoint: PathBuf::from(DEFAULT_CHECKPOINT),
            bell: true,
            autosave_secs: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub checkpoint: Option<PathBuf>,
    pub no_bell: bool,
    pub autosave_secs: Option<u64>,
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), otherwise the default file
    /// if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn apply(mut self, overrides: &Overrides) -> Result<Self> {
        if let Some(path) = &overrides.checkpoint {
            self.checkpoint = path.clone();
        }
        if overrides.no_bell {
            self.bell = false;
        }
        if overrides.autosave_secs.is_some() {
            self.autosave_secs = overrides.autosave_secs;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn autosave_interval(&self) -> Option<Duration> {
        self.autosave_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.checkpoint.as_os_str().is_empty() {
            bail!("checkpoint path must not be empty");
        }
        if self.autosave_secs == Some(0) {
            bail!("autosave_secs must be at least 1");
        }
        Ok(())
    }
}
