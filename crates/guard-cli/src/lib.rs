//! Target Guard command-line support
//!
//! File loading and report rendering behind the `target-guard` binary.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod settings;
pub mod snapshot;

use anyhow::Result;
use guard_conflict::{
    format_conflicts, ActiveTarget, CandidateTarget, ConflictGuard, GateOutcome, NO_CONFLICTS,
};
use guard_target::{canonicalize, keys_for, normalize};

pub use settings::load_config;
pub use snapshot::{load_snapshot, parse_snapshot};

/// Rendered result of a `check` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Publication must be blocked
    pub rejected: bool,
    /// Operator-facing text
    pub text: String,
}

/// Gate a candidate against a snapshot and render the outcome
///
/// # Errors
/// Returns error for gate failures other than conflicts
pub fn check_report(
    guard: &ConflictGuard,
    active: &[ActiveTarget],
    candidate: &CandidateTarget,
) -> Result<CheckReport> {
    match guard.gate(active, candidate) {
        Ok(GateOutcome::Clear) => Ok(CheckReport {
            rejected: false,
            text: NO_CONFLICTS.to_string(),
        }),
        Ok(GateOutcome::Warned(conflicts)) => Ok(CheckReport {
            rejected: false,
            text: format!(
                "Publishing despite {} conflict(s)\n{}",
                conflicts.len(),
                format_conflicts(conflicts)
            ),
        }),
        Err(err) if err.is_conflict() => Ok(CheckReport {
            rejected: true,
            text: format!("{}: {}", err.code().map_or("", |c| c.as_str()), err.render()),
        }),
        Err(err) => Err(err.into()),
    }
}

/// Canonical forms and keys of a selector/role pair, one `name: value` per line
#[must_use]
pub fn key_report(selector: Option<&str>, role: Option<&str>) -> String {
    let keys = keys_for(selector, role);
    let canonical = selector.map(canonicalize).unwrap_or_default();

    let target_key = keys.target_key.map_or_else(|| "-".to_string(), |k| k.to_string());
    let role_key = keys.role_key.map_or_else(|| "-".to_string(), |k| k.to_string());
    let canonical = if canonical.is_empty() { "-" } else { canonical.as_str() };

    format!("selector: {canonical}\ntarget_key: {target_key}\nrole_key: {role_key}")
}

/// Canonical pattern of a URL
#[must_use]
pub fn normalize_report(url: &str) -> String {
    normalize(url).into_string()
}

/// Pretty JSON reserved payload for a page
///
/// # Errors
/// Returns error if serialization fails
pub fn reserved_report(
    guard: &ConflictGuard,
    context_url: &str,
    active: &[ActiveTarget],
) -> Result<String> {
    let payload = guard.reserved_payload(context_url, active);
    Ok(serde_json::to_string_pretty(&payload)?)
}
