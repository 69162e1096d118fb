//! Conflict detection
//!
//! A candidate conflicts with an active target when their page patterns
//! overlap and they share either a target key (same DOM region) or a role
//! key (same semantic slot). Distinct regions on an overlapping page are
//! allowed to coexist.

use std::fmt;

use guard_target::{overlaps, TargetKeys, UrlPattern};

use crate::target::{ActiveTarget, CandidateTarget};

/// Message rendered when no conflicts were found
pub const NO_CONFLICTS: &str = "No conflicts found";

/// Why an active target collides with a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictReason {
    /// Identical canonical selector
    SameTarget,
    /// Same semantic role, possibly different markup
    SameRole,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameTarget => f.write_str("same target"),
            Self::SameRole => f.write_str("same role"),
        }
    }
}

/// Decide whether one active target collides with a canonical candidate
///
/// `pattern` and `keys` are the candidate's canonical forms.
#[must_use]
pub fn conflict_reason(
    active: &ActiveTarget,
    pattern: &UrlPattern,
    keys: &TargetKeys,
) -> Option<ConflictReason> {
    if !overlaps(pattern, &active.url_pattern) {
        return None;
    }

    match (&keys.target_key, &active.target_key) {
        (Some(candidate), Some(reserved)) if candidate == reserved => {
            return Some(ConflictReason::SameTarget);
        }
        _ => {}
    }

    match (&keys.role_key, &active.role_key) {
        (Some(candidate), Some(reserved)) if candidate == reserved => Some(ConflictReason::SameRole),
        _ => None,
    }
}

/// Find every active target that collides with the candidate
///
/// Results keep the snapshot order. An empty result means the candidate
/// may be published.
#[must_use]
pub fn find_conflicts<'a>(
    active: &'a [ActiveTarget],
    candidate: &CandidateTarget,
) -> Vec<&'a ActiveTarget> {
    let pattern = candidate.pattern();
    let keys = candidate.keys();

    let conflicts: Vec<&ActiveTarget> = active
        .iter()
        .filter(|target| match conflict_reason(target, &pattern, &keys) {
            Some(reason) => {
                tracing::debug!(
                    experiment = %target.experiment_id,
                    pattern = %target.url_pattern,
                    %reason,
                    "candidate collides with active target"
                );
                true
            }
            None => false,
        })
        .collect();

    tracing::debug!(
        candidate = %pattern,
        checked = active.len(),
        conflicts = conflicts.len(),
        "conflict check finished"
    );

    conflicts
}

/// Render conflicts for an operator, one line per conflict
///
/// Each line reads `  - Experiment <id>: <label> on <urlPattern>`; an empty
/// list renders as [`NO_CONFLICTS`].
#[must_use]
pub fn format_conflicts<'a, I>(conflicts: I) -> String
where
    I: IntoIterator<Item = &'a ActiveTarget>,
{
    let lines: Vec<String> = conflicts
        .into_iter()
        .map(|t| format!("  - Experiment {}: {} on {}", t.experiment_id, t.label, t.url_pattern))
        .collect();

    if lines.is_empty() {
        NO_CONFLICTS.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guard_target::{keys_for, normalize};

    fn reserved(id: &str, url: &str, selector: Option<&str>, role: Option<&str>) -> ActiveTarget {
        ActiveTarget::reserve(id, url, selector, role, format!("{id} label"))
    }

    #[test]
    fn identical_selector_on_overlapping_page_conflicts() {
        let active = vec![reserved("exp-1", "/products/1", Some(".hero h1"), None)];
        let candidate = CandidateTarget::new("/products/blue-shoe").with_selector(".hero  H1");

        let conflicts = find_conflicts(&active, &candidate);
        assert_eq!(conflicts, vec![&active[0]]);
    }

    #[test]
    fn different_page_never_conflicts() {
        let active = vec![reserved("exp-1", "/products/1", Some(".hero"), Some("hero"))];
        let candidate = CandidateTarget::new("/about").with_selector(".hero").with_role("hero");
        assert!(find_conflicts(&active, &candidate).is_empty());
    }

    #[test]
    fn distinct_regions_coexist() {
        let active = vec![reserved("exp-1", "/products/1", Some(".hero"), Some("hero"))];
        let candidate = CandidateTarget::new("/products/2")
            .with_selector(".footer")
            .with_role("footer");
        assert!(find_conflicts(&active, &candidate).is_empty());
    }

    #[test]
    fn role_conflict_without_matching_selector() {
        let active = vec![
            reserved("exp-1", "/products/1", Some("button.buy"), Some("Primary CTA")),
            reserved("exp-2", "/products/1", None, Some("primary cta")),
        ];
        let candidate = CandidateTarget::new("/products/9")
            .with_selector("a.purchase")
            .with_role("primary cta");

        let conflicts = find_conflicts(&active, &candidate);
        assert_eq!(conflicts.len(), 2);
    }

    #[test]
    fn missing_keys_never_match() {
        let active = vec![reserved("exp-1", "/products/1", None, None)];
        let candidate = CandidateTarget::new("/products/1");
        assert!(find_conflicts(&active, &candidate).is_empty());
    }

    #[test]
    fn conflict_reason_prefers_target_key() {
        let target = reserved("exp-1", "/checkout", Some("#pay"), Some("pay"));
        let keys = keys_for(Some("#pay"), Some("pay"));
        assert_eq!(
            conflict_reason(&target, &normalize("/checkout"), &keys),
            Some(ConflictReason::SameTarget)
        );

        let role_only = keys_for(Some("#other"), Some("PAY"));
        assert_eq!(
            conflict_reason(&target, &normalize("/checkout"), &role_only),
            Some(ConflictReason::SameRole)
        );
    }

    #[test]
    fn all_conflicts_returned_in_order() {
        let active = vec![
            reserved("exp-1", "/products/1", Some(".hero"), None),
            reserved("exp-2", "/collections", Some(".hero"), None),
            reserved("exp-3", "/products/*", Some(".hero"), None),
        ];
        let candidate = CandidateTarget::new("/products/shoe-9").with_selector(".hero");

        let ids: Vec<_> = find_conflicts(&active, &candidate)
            .into_iter()
            .map(|t| t.experiment_id.as_str())
            .collect();
        assert_eq!(ids, vec!["exp-1", "exp-3"]);
    }

    #[test]
    fn format_lines() {
        let active = vec![
            reserved("exp-1", "/products/1", Some(".hero"), None),
            reserved("exp-2", "/about", None, Some("hero")),
        ];
        assert_eq!(
            format_conflicts(&active),
            "  - Experiment exp-1: exp-1 label on /products/*\n  - Experiment exp-2: exp-2 label on /about"
        );
        assert_eq!(format_conflicts(Vec::<&ActiveTarget>::new()), NO_CONFLICTS);
    }
}
