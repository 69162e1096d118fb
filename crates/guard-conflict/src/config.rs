//! Guard configuration
//!
//! [`GuardConfig`] is plain data: built in code with the `with_*` methods or
//! parsed from TOML. Missing keys fall back to defaults.
//!
//! ```toml
//! max_reserved_items = 5
//! global_scopes = ["body", "html", ":root", "#app"]
//! policy = "warn"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::GuardError;
use crate::indirect::DEFAULT_GLOBAL_SCOPES;
use crate::payload::DEFAULT_MAX_RESERVED_ITEMS;

/// What a publish gate does when conflicts are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail with [`GuardError::Conflict`]
    #[default]
    Reject,
    /// Log a warning and let the publish proceed
    Warn,
}

/// Guard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Bound on reservations in a reserved payload
    pub max_reserved_items: usize,
    /// Selector prefixes treated as document-wide by the indirect check
    pub global_scopes: Vec<String>,
    /// Gate behaviour on conflicts
    pub policy: ConflictPolicy,
}

impl GuardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With payload bound
    #[inline]
    #[must_use]
    pub fn with_max_reserved_items(mut self, max: usize) -> Self {
        self.max_reserved_items = max;
        self
    }

    /// With global scopes
    #[inline]
    #[must_use]
    pub fn with_global_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// With conflict policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse and validate TOML configuration
    ///
    /// # Errors
    /// Returns [`GuardError::Config`] if the TOML is malformed or invalid
    pub fn from_toml_str(input: &str) -> Result<Self, GuardError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check configuration values
    ///
    /// # Errors
    /// Returns [`GuardError::Config`] describing the first invalid value
    pub fn validate(&self) -> Result<(), GuardError> {
        if self.max_reserved_items == 0 {
            return Err(GuardError::Config(
                "max_reserved_items must be greater than zero".to_string(),
            ));
        }
        if self.global_scopes.iter().any(|s| s.trim().is_empty()) {
            return Err(GuardError::Config(
                "global_scopes must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_reserved_items: DEFAULT_MAX_RESERVED_ITEMS,
            global_scopes: DEFAULT_GLOBAL_SCOPES.iter().map(ToString::to_string).collect(),
            policy: ConflictPolicy::Reject,
        }
    }
}
