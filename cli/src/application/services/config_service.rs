//! Application service — configuration use-cases.

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{ProvisionConfig, validate};

/// Load the configuration and validate it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or fails validation.
pub fn load_config(store: &impl ConfigStore) -> Result<ProvisionConfig> {
    let config = store.load()?;
    validate(&config).with_context(|| format!("invalid config {}", store.path().display()))?;
    tracing::debug!(path = %store.path().display(), "configuration loaded");
    Ok(config)
}
