//! Active and candidate targets
//!
//! An [`ActiveTarget`] is a DOM region reserved by a running experiment; a
//! [`CandidateTarget`] is a proposed reservation that has not been
//! canonicalized yet.

use guard_target::{keys_for, normalize, RoleKey, TargetKey, TargetKeys, UrlPattern};
use serde::{Deserialize, Serialize};

/// A DOM region currently reserved by a running experiment
///
/// Supplied by the caller as an immutable snapshot; the guard never stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveTarget {
    /// Owning experiment
    pub experiment_id: String,
    /// Canonical page pattern the experiment runs on
    pub url_pattern: UrlPattern,
    /// Hash of the canonical selector, absent for role-only targeting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_key: Option<TargetKey>,
    /// Normalized semantic role, absent for selector-only targeting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_key: Option<RoleKey>,
    /// Human-readable description of the region
    #[serde(default)]
    pub label: String,
}

impl ActiveTarget {
    /// Create from an already canonical pattern and keys
    #[must_use]
    pub fn new(
        experiment_id: impl Into<String>,
        url_pattern: UrlPattern,
        keys: TargetKeys,
        label: impl Into<String>,
    ) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            url_pattern,
            target_key: keys.target_key,
            role_key: keys.role_key,
            label: label.into(),
        }
    }

    /// Reserve a region from raw input
    ///
    /// The URL, selector and role are canonicalized exactly the way a
    /// [`CandidateTarget`] is, so a stored reservation compares equal to a
    /// later candidate for the same region.
    #[must_use]
    pub fn reserve(
        experiment_id: impl Into<String>,
        url: &str,
        selector: Option<&str>,
        role: Option<&str>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(experiment_id, normalize(url), keys_for(selector, role), label)
    }

    /// Identity keys of this target
    #[inline]
    #[must_use]
    pub fn keys(&self) -> TargetKeys {
        TargetKeys {
            target_key: self.target_key,
            role_key: self.role_key.clone(),
        }
    }
}

/// A proposed reservation, not yet canonicalized
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateTarget {
    /// Full URL or bare path
    pub url: String,
    /// Raw CSS selector
    #[serde(default)]
    pub selector: Option<String>,
    /// Raw semantic role label
    #[serde(default)]
    pub role: Option<String>,
}

impl CandidateTarget {
    /// Create candidate for a URL with no selector or role
    #[inline]
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            selector: None,
            role: None,
        }
    }

    /// With CSS selector
    #[inline]
    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// With semantic role
    #[inline]
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Canonical pattern of the candidate URL
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> UrlPattern {
        normalize(&self.url)
    }

    /// Identity keys of the candidate
    #[inline]
    #[must_use]
    pub fn keys(&self) -> TargetKeys {
        keys_for(self.selector.as_deref(), self.role.as_deref())
    }
}
