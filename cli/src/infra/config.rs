//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::ProvisionConfig;

/// Config file used when neither `--config` nor `BUILDHOST_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "fab.conf";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "BUILDHOST_CONFIG";

/// Production implementation of `ConfigStore` that reads a TOML file on disk.
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Pick the config file: `explicit`, else `$BUILDHOST_CONFIG`, else
    /// `fab.conf` in the working directory.
    #[must_use]
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            if !val.is_empty() {
                return Self::new(val);
            }
        }
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<ProvisionConfig> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        toml::from_str(&content).with_context(|| format!("cannot parse {}", self.path.display()))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
