//! Guard Conflict Detection
//!
//! Decides whether a proposed experiment target collides with experiments
//! already running, and summarizes running reservations for planners.
//!
//! # Core Concepts
//!
//! - [`ActiveTarget`] / [`CandidateTarget`]: Reserved and proposed regions
//! - [`find_conflicts`]: Hard conflicts (same page, same target or role)
//! - [`might_indirectly_affect`]: Advisory check for indirect interference
//! - [`to_reserved_payload`]: Bounded, redacted summary of reservations
//! - [`ConflictGuard`]: Configured entry point with publish gates
//!
//! Everything here is a pure function of its arguments. The caller supplies
//! a consistent snapshot of active targets per decision.
//!
//! # Example
//!
//! ```rust
//! use guard_conflict::{find_conflicts, ActiveTarget, CandidateTarget};
//!
//! let active = vec![ActiveTarget::reserve(
//!     "exp-1",
//!     "https://shop.test/products/123",
//!     Some(".hero h1"),
//!     None,
//!     "Hero title",
//! )];
//!
//! let candidate = CandidateTarget::new("/products/blue-shoe").with_selector(".hero  H1");
//! assert_eq!(find_conflicts(&active, &candidate).len(), 1);
//!
//! let elsewhere = CandidateTarget::new("/about").with_selector(".hero h1");
//! assert!(find_conflicts(&active, &elsewhere).is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod detector;
mod error;
mod guard;
mod indirect;
mod payload;
mod target;

// Re-exports
pub use config::{ConflictPolicy, GuardConfig};
pub use detector::{conflict_reason, find_conflicts, format_conflicts, ConflictReason, NO_CONFLICTS};
pub use error::{ConflictCode, GuardError};
pub use guard::{ConflictGuard, GateOutcome, IndirectRisk};
pub use indirect::{indirect_effect, might_indirectly_affect, IndirectEffect, DEFAULT_GLOBAL_SCOPES};
pub use payload::{
    to_reserved_payload, ReservedEntry, ReservedPayload, ReservedRules, DEFAULT_MAX_RESERVED_ITEMS,
    SELECTOR_PROTECTED,
};
pub use target::{ActiveTarget, CandidateTarget};

pub use guard_target::{RoleKey, TargetKey, TargetKeys, UrlPattern};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
