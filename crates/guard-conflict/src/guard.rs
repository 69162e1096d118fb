//! Configured entry point for publish workflows
//!
//! [`ConflictGuard`] owns nothing but its [`GuardConfig`]; every call takes
//! the active-target snapshot explicitly.

use crate::config::{ConflictPolicy, GuardConfig};
use crate::detector::find_conflicts;
use crate::error::GuardError;
use crate::indirect::{indirect_effect, IndirectEffect};
use crate::payload::{to_reserved_payload, ReservedPayload};
use crate::target::{ActiveTarget, CandidateTarget};

/// Result of a publish gate that did not reject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome<'a> {
    /// No conflicts
    Clear,
    /// Conflicts found but allowed by [`ConflictPolicy::Warn`]
    Warned(Vec<&'a ActiveTarget>),
}

impl GateOutcome<'_> {
    /// Check if the gate found nothing
    #[inline]
    #[must_use]
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }
}

/// An active target flagged by the advisory indirect-effect check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectRisk<'a> {
    /// Reserved target that may be disturbed
    pub target: &'a ActiveTarget,
    /// Suspected interference
    pub effect: IndirectEffect,
}

/// Conflict guard bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct ConflictGuard {
    config: GuardConfig,
}

impl ConflictGuard {
    /// Create guard with configuration
    #[inline]
    #[must_use]
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Fail if the candidate collides with any active target
    ///
    /// # Errors
    /// Returns [`GuardError::Conflict`] listing every conflict
    pub fn ensure_no_conflicts(
        &self,
        active: &[ActiveTarget],
        candidate: &CandidateTarget,
    ) -> Result<(), GuardError> {
        let conflicts = find_conflicts(active, candidate);
        if conflicts.is_empty() {
            return Ok(());
        }
        Err(reject(candidate, &conflicts))
    }

    /// Apply the configured [`ConflictPolicy`] to the candidate
    ///
    /// # Errors
    /// Returns [`GuardError::Conflict`] when conflicts exist and the policy
    /// is [`ConflictPolicy::Reject`]
    pub fn gate<'a>(
        &self,
        active: &'a [ActiveTarget],
        candidate: &CandidateTarget,
    ) -> Result<GateOutcome<'a>, GuardError> {
        let conflicts = find_conflicts(active, candidate);
        if conflicts.is_empty() {
            return Ok(GateOutcome::Clear);
        }

        match self.config.policy {
            ConflictPolicy::Reject => Err(reject(candidate, &conflicts)),
            ConflictPolicy::Warn => {
                for target in &conflicts {
                    tracing::warn!(
                        url = %candidate.url,
                        experiment = %target.experiment_id,
                        pattern = %target.url_pattern,
                        "publishing despite conflict"
                    );
                }
                Ok(GateOutcome::Warned(conflicts))
            }
        }
    }

    /// Reserved payload bounded by the configured item count
    #[inline]
    #[must_use]
    pub fn reserved_payload(&self, context_url: &str, active: &[ActiveTarget]) -> ReservedPayload {
        to_reserved_payload(context_url, active, self.config.max_reserved_items)
    }

    /// Advisory indirect-effect check using the configured global scopes
    #[inline]
    #[must_use]
    pub fn might_indirectly_affect(&self, proposal: Option<&str>, reserved: Option<&str>) -> bool {
        indirect_effect(proposal, reserved, self.config.global_scopes.as_slice()).is_some()
    }

    /// Reserved targets the proposal might indirectly disturb
    ///
    /// Active targets only carry selector hashes, so the caller pairs each
    /// target with the raw selector it holds for it.
    #[must_use]
    pub fn indirect_risks<'a>(
        &self,
        proposal_selector: &str,
        reserved: &[(&'a ActiveTarget, &str)],
    ) -> Vec<IndirectRisk<'a>> {
        reserved
            .iter()
            .filter_map(|&(target, selector)| {
                indirect_effect(
                    Some(proposal_selector),
                    Some(selector),
                    self.config.global_scopes.as_slice(),
                )
                .map(|effect| IndirectRisk { target, effect })
            })
            .collect()
    }
}

fn reject(candidate: &CandidateTarget, conflicts: &[&ActiveTarget]) -> GuardError {
    tracing::info!(
        url = %candidate.url,
        conflicts = conflicts.len(),
        "rejecting candidate target"
    );
    GuardError::conflict(conflicts.iter().map(|&target| target.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Vec<ActiveTarget> {
        vec![
            ActiveTarget::reserve("exp-1", "/products/1", Some(".hero h1"), None, "Hero title"),
            ActiveTarget::reserve("exp-2", "/products/1", None, Some("primary cta"), "Buy button"),
        ]
    }

    #[test]
    fn ensure_no_conflicts_passes_for_distinct_target() {
        let guard = ConflictGuard::default();
        let candidate = CandidateTarget::new("/products/2").with_selector(".reviews");
        assert!(guard.ensure_no_conflicts(&snapshot(), &candidate).is_ok());
    }

    #[test]
    fn ensure_no_conflicts_carries_targets() {
        let guard = ConflictGuard::default();
        let active = snapshot();
        let candidate = CandidateTarget::new("/products/2").with_role("Primary CTA");

        let err = guard.ensure_no_conflicts(&active, &candidate).unwrap_err();
        assert_eq!(err.conflicts(), &active[1..]);
    }

    #[test]
    fn gate_rejects_by_default() {
        let guard = ConflictGuard::default();
        let candidate = CandidateTarget::new("/products/9").with_selector("  .hero   H1 ");
        assert!(matches!(
            guard.gate(&snapshot(), &candidate),
            Err(GuardError::Conflict { .. })
        ));
    }

    #[test]
    fn gate_and_ensure_reject_identically() {
        let guard = ConflictGuard::default();
        let active = snapshot();
        let candidate = CandidateTarget::new("/products/9")
            .with_selector(".hero h1")
            .with_role("primary cta");

        let gated = guard.gate(&active, &candidate).unwrap_err();
        let ensured = guard.ensure_no_conflicts(&active, &candidate).unwrap_err();
        assert_eq!(gated.render(), ensured.render());
        assert_eq!(gated.conflicts(), ensured.conflicts());
        assert_eq!(ensured.conflicts(), &active[..]);
    }

    #[test]
    fn gate_warns_when_configured() {
        let guard = ConflictGuard::new(GuardConfig::new().with_policy(ConflictPolicy::Warn));
        let active = snapshot();
        let candidate = CandidateTarget::new("/products/9").with_selector(".hero h1");

        let outcome = guard.gate(&active, &candidate).unwrap();
        assert_eq!(outcome, GateOutcome::Warned(vec![&active[0]]));
        assert!(!outcome.is_clear());
    }

    #[test]
    fn gate_clear() {
        let guard = ConflictGuard::default();
        let candidate = CandidateTarget::new("/about").with_selector(".hero h1");
        assert!(guard.gate(&snapshot(), &candidate).unwrap().is_clear());
    }

    #[test]
    fn reserved_payload_uses_configured_bound() {
        let guard = ConflictGuard::new(GuardConfig::new().with_max_reserved_items(1));
        let payload = guard.reserved_payload("/products/5", &snapshot());
        assert_eq!(payload.reserved.len(), 1);
    }

    #[test]
    fn indirect_risks_flags_related_selectors() {
        let guard = ConflictGuard::default();
        let active = snapshot();
        let reserved = [(&active[0], ".hero h1"), (&active[1], "footer .buy")];

        let risks = guard.indirect_risks(".hero p", &reserved);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].target.experiment_id, "exp-1");
        assert_eq!(risks[0].effect, IndirectEffect::SharedParent);

        assert_eq!(guard.indirect_risks("body", &reserved).len(), 2);
    }

    #[test]
    fn custom_scopes_respected() {
        let guard = ConflictGuard::new(GuardConfig::new().with_global_scopes(["#app"]));
        assert!(guard.might_indirectly_affect(Some("#app main"), Some(".x")));
        assert!(!guard.might_indirectly_affect(Some("body"), Some(".x")));
    }
}
