//! Guard Target Primitives
//!
//! Canonical forms used to identify the page and DOM region an experiment
//! targets.
//!
//! # Core Concepts
//!
//! - [`UrlPattern`]: Wildcard path pattern produced by [`normalize`]
//! - [`overlaps`]: Could two patterns ever match the same URL
//! - [`CanonicalSelector`]: CSS selector with cosmetic differences removed
//! - [`TargetKey`]: 32-byte BLAKE3 hash of a canonical selector
//! - [`RoleKey`]: Normalized semantic role (`role:<role>`)
//!
//! # Example
//!
//! ```rust
//! use guard_target::{keys_for, normalize};
//!
//! let pattern = normalize("https://shop.test/products/blue-shoe");
//! assert_eq!(pattern.as_str(), "/products/*");
//!
//! let a = keys_for(Some("DIV.b.a"), None);
//! let b = keys_for(Some("div .a.b"), None);
//! assert_eq!(a.target_key, b.target_key);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod key;
mod pattern;
mod selector;

// Re-exports
pub use key::{keys_for, KeyError, RoleKey, TargetKey, TargetKeys, ROLE_PREFIX};
pub use pattern::{is_dynamic_segment, normalize, overlaps, UrlPattern, MATCH_ALL, WILDCARD};
pub use selector::{canonicalize, CanonicalSelector};

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn pattern_and_key_integration() {
        let stored = normalize("https://shop.test/products/123");
        let visiting = normalize("/products/blue-shoe?ref=mail");
        assert_eq!(stored, visiting);
        assert!(stored.overlaps(&visiting));

        let key = TargetKey::from_canonical(&canonicalize("button.Primary.cta"));
        assert_eq!(Some(key), TargetKey::for_selector("BUTTON .cta.Primary"));
    }
}
