//! Reserved-target summary for planning prompts
//!
//! Projects the active-target snapshot into a bounded, redacted list of
//! reservations relevant to one page. Raw selectors never appear; only the
//! fact that a selector-based reservation exists.

use guard_target::{normalize, UrlPattern};
use serde::{Deserialize, Serialize};

use crate::target::ActiveTarget;

/// Placeholder emitted instead of a reserved selector
pub const SELECTOR_PROTECTED: &str = "[selector-protected]";

/// Default bound on reservations in one payload
pub const DEFAULT_MAX_RESERVED_ITEMS: usize = 10;

/// Reservations in scope for one page, plus the policy they imply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedPayload {
    /// Canonical pattern of the page being planned
    pub scope: UrlPattern,
    /// Reservations overlapping the scope, at most `max_items`
    pub reserved: Vec<ReservedEntry>,
    /// Fixed policy block
    pub rules: ReservedRules,
}

/// One redacted reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedEntry {
    /// Page pattern of the reservation
    pub url_pattern: UrlPattern,
    /// Role label without the `role:` prefix
    pub role: Option<String>,
    /// [`SELECTOR_PROTECTED`] when a selector is reserved
    pub selector: Option<String>,
    /// Descriptive labels of the region
    pub semantics: Vec<String>,
    /// Owning experiment
    pub experiment_id: String,
}

impl From<&ActiveTarget> for ReservedEntry {
    fn from(target: &ActiveTarget) -> Self {
        Self {
            url_pattern: target.url_pattern.clone(),
            role: target.role_key.as_ref().map(|k| k.role().to_string()),
            selector: target.target_key.map(|_| SELECTOR_PROTECTED.to_string()),
            semantics: vec![target.label.clone()],
            experiment_id: target.experiment_id.clone(),
        }
    }
}

/// Policy signalled to the consumer of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedRules {
    /// Reservations are binding
    pub strict: bool,
    /// Consumer must check its own targets for overlap
    pub check_overlaps: bool,
    /// Consumer must avoid changes that indirectly disturb reservations
    pub prevent_indirect_changes: bool,
}

impl Default for ReservedRules {
    fn default() -> Self {
        Self {
            strict: true,
            check_overlaps: true,
            prevent_indirect_changes: true,
        }
    }
}

impl ReservedPayload {
    /// JSON value for embedding into a request body
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Summarize the reservations that apply to `context_url`
///
/// Keeps active targets whose pattern overlaps the page, in snapshot order,
/// truncated to `max_items`.
#[must_use]
pub fn to_reserved_payload(
    context_url: &str,
    active: &[ActiveTarget],
    max_items: usize,
) -> ReservedPayload {
    let scope = normalize(context_url);

    let reserved: Vec<ReservedEntry> = active
        .iter()
        .filter(|target| scope.overlaps(&target.url_pattern))
        .take(max_items)
        .map(ReservedEntry::from)
        .collect();

    tracing::debug!(
        scope = %scope,
        reserved = reserved.len(),
        max_items,
        "built reserved payload"
    );

    ReservedPayload {
        scope,
        reserved,
        rules: ReservedRules::default(),
    }
}
