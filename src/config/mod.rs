use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use serde::HumantimeDuration;

const COUNT_BOUNDS: RangeInclusive<usize> = 1..=100;

/// Settings for the demo runner. The scheduler's own margins are
/// implementation constants and are not configurable here.
#[derive(Debug, Clone)]
pub struct Config {
    pub count: usize,
    pub duration: Duration,
    pub enqueue_gap: Duration,
    pub notify: NotifySettings,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub appname: String,
    pub icon: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be parsed, when
    /// environment overrides are invalid, or when the resulting values fail
    /// validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path)?;
        raw.apply_env_overrides()?;
        raw.validate_and_build()
    }
}
