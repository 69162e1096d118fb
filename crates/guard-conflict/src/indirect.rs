//! Advisory check for indirect interference between selectors
//!
//! Two experiments can disturb each other without touching the same node:
//! restyling a container shifts its children, editing a sibling reflows the
//! parent, and anything on `body` cascades everywhere. The checks here are
//! plain string heuristics with a known false-positive rate. Their result is
//! a hint for a reviewer and never gates publication.

/// Document-wide scopes assumed to cascade into every element
pub const DEFAULT_GLOBAL_SCOPES: [&str; 3] = ["body", "html", ":root"];

/// Kind of indirect interference suspected between two selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndirectEffect {
    /// One selector contains the other (ancestor or descendant)
    Containment,
    /// Both selectors share the same parent prefix (siblings, layout shift)
    SharedParent,
    /// The proposal is scoped to a document-wide element
    GlobalScope,
}

/// Check if a proposal might indirectly affect a reserved selector
///
/// Uses [`DEFAULT_GLOBAL_SCOPES`]. Returns `false` when either selector is
/// absent or blank.
#[must_use]
pub fn might_indirectly_affect(proposal: Option<&str>, reserved: Option<&str>) -> bool {
    indirect_effect(proposal, reserved, &DEFAULT_GLOBAL_SCOPES).is_some()
}

/// Classify the suspected interference between two selectors
///
/// Checks run in order: containment, shared parent, global scope.
#[must_use]
pub fn indirect_effect<S: AsRef<str>>(
    proposal: Option<&str>,
    reserved: Option<&str>,
    global_scopes: &[S],
) -> Option<IndirectEffect> {
    let proposal = proposal.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())?;
    let reserved = reserved.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())?;

    if proposal.contains(&reserved) || reserved.contains(&proposal) {
        return Some(IndirectEffect::Containment);
    }

    if let (Some(a), Some(b)) = (parent_of(&proposal), parent_of(&reserved)) {
        if a == b {
            return Some(IndirectEffect::SharedParent);
        }
    }

    global_scopes
        .iter()
        .map(|scope| scope.as_ref().trim().to_lowercase())
        .any(|scope| !scope.is_empty() && proposal.starts_with(&scope))
        .then_some(IndirectEffect::GlobalScope)
}

/// Selector with its last whitespace-delimited token removed
fn parent_of(selector: &str) -> Option<String> {
    let tokens: Vec<&str> = selector.split_whitespace().collect();
    match tokens.split_last() {
        Some((_, parent)) if !parent.is_empty() => Some(parent.join(" ")),
        _ => None,
    }
}
