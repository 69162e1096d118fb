//! Testing utilities for the target guard workspace
//!
//! Shared fixtures for snapshots of running experiments.

#![allow(missing_docs)]

use guard_conflict::{ActiveTarget, CandidateTarget};

pub const STORE: &str = "https://shop.test";

pub fn store_url(path: &str) -> String {
    format!("{STORE}{path}")
}

pub fn selector_target(experiment_id: &str, url: &str, selector: &str, label: &str) -> ActiveTarget {
    ActiveTarget::reserve(experiment_id, url, Some(selector), None, label)
}

pub fn role_target(experiment_id: &str, url: &str, role: &str, label: &str) -> ActiveTarget {
    ActiveTarget::reserve(experiment_id, url, None, Some(role), label)
}

pub fn candidate(url: &str, selector: &str) -> CandidateTarget {
    CandidateTarget::new(url).with_selector(selector)
}

/// Storefront with a product hero, a product CTA role, a blog banner and a
/// site-wide announcement bar
pub fn storefront_snapshot() -> Vec<ActiveTarget> {
    vec![
        selector_target(
            "exp-hero",
            &store_url("/products/42"),
            "section.product.hero h1",
            "Product hero title",
        ),
        role_target("exp-cta", &store_url("/products/blue-shoe"), "Primary CTA", "Buy button"),
        selector_target(
            "exp-blog",
            &store_url("/blog/2024/03/launch"),
            "article .banner",
            "Blog banner",
        ),
        selector_target("exp-bar", "/*", "body > .announcement", "Site-wide bar"),
    ]
}

/// `count` selector reservations spread over product pages
pub fn product_snapshot(count: usize) -> Vec<ActiveTarget> {
    (0..count)
        .map(|i| {
            selector_target(
                &format!("exp-{i}"),
                &format!("/products/{i}"),
                &format!(".slot-{i}"),
                &format!("Slot {i}"),
            )
        })
        .collect()
}
