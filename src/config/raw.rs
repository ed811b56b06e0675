use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;

use super::defaults::{default_appname, default_count, default_duration, default_enqueue_gap};
use super::env::{lookup, lookup_duration, lookup_parse};
use super::{COUNT_BOUNDS, Config, HumantimeDuration, NotifySettings};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("TOASTQ")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) demo: RawDemo,
    #[serde(default)]
    pub(super) notify: RawNotify,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawDemo {
    #[serde(default = "default_count")]
    pub(super) count: usize,
    #[serde(default = "default_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) duration: Duration,
    #[serde(default = "default_enqueue_gap")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) enqueue_gap: Duration,
    #[serde(default)]
    pub(super) dry_run: bool,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawNotify {
    #[serde(default = "default_appname")]
    pub(super) appname: String,
    #[serde(default)]
    pub(super) icon: Option<PathBuf>,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(count) = lookup_parse::<usize>("TOAST_COUNT")? {
            self.demo.count = count;
        }
        if let Some(duration) = lookup_duration("TOAST_DURATION")? {
            self.demo.duration = duration;
        }
        if let Some(gap) = lookup_duration("TOAST_ENQUEUE_GAP")? {
            self.demo.enqueue_gap = gap;
        }
        if let Some(dry_run) = lookup_parse::<bool>("TOAST_DRY_RUN")? {
            self.demo.dry_run = dry_run;
        }
        if let Some(appname) = lookup("NOTIFY_APPNAME")? {
            self.notify.appname = appname;
        }
        if let Some(icon) = lookup("NOTIFY_ICON")? {
            self.notify.icon = Some(PathBuf::from(icon));
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        if !COUNT_BOUNDS.contains(&self.demo.count) {
            return Err(ConfigError::InvalidField {
                field: "demo.count",
                message: format!(
                    "expected between {} and {}, got {}",
                    COUNT_BOUNDS.start(),
                    COUNT_BOUNDS.end(),
                    self.demo.count
                ),
            }
            .into());
        }
        if self.notify.appname.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "notify.appname",
                message: "application name cannot be empty".to_string(),
            }
            .into());
        }

        Ok(Config {
            count: self.demo.count,
            duration: self.demo.duration,
            enqueue_gap: self.demo.enqueue_gap,
            notify: NotifySettings {
                appname: self.notify.appname,
                icon: self.notify.icon,
            },
            dry_run: self.demo.dry_run,
        })
    }
}

impl Default for RawDemo {
    fn default() -> Self {
        Self {
            count: default_count(),
            duration: default_duration(),
            enqueue_gap: default_enqueue_gap(),
            dry_run: false,
        }
    }
}

impl Default for RawNotify {
    fn default() -> Self {
        Self {
            appname: default_appname(),
            icon: None,
        }
    }
}
