//! Guard configuration files

use std::path::Path;

use anyhow::{Context, Result};
use guard_conflict::GuardConfig;

/// Load a TOML configuration file, or defaults when no path is given
///
/// # Errors
/// Returns error if the file cannot be read, parsed or validated
pub fn load_config(path: Option<&Path>) -> Result<GuardConfig> {
    let Some(path) = path else {
        return Ok(GuardConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = GuardConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        policy = ?config.policy,
        max_reserved_items = config.max_reserved_items,
        "loaded config"
    );
    Ok(config)
}
