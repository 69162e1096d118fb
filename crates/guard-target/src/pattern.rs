//! Canonical URL patterns
//!
//! Provides [`UrlPattern`], the wildcard path form used to decide whether
//! two experiments can ever run on the same page, together with the
//! normalizer that produces it and the overlap check between two patterns.

use std::fmt::{self, Display, Formatter};

use regex::Regex;
use url::Url;
use uuid::Uuid;

/// Token standing in for one dynamic path segment
pub const WILDCARD: char = '*';

/// Pattern that matches every path
pub const MATCH_ALL: &str = "/*";

/// Canonical wildcard path pattern
///
/// Canonical patterns start with `/`, never contain repeated slashes and
/// never end with `/` (except the root). Every segment after the first is
/// either literal or [`WILDCARD`].
///
/// Patterns that failed to parse are still carried as a `UrlPattern`; they
/// report `false` from [`UrlPattern::is_canonical`] and are compared as
/// opaque literals.
///
/// # Examples
/// - `https://shop.test/products/blue-shoe` → `/products/*`
/// - `/blog/2024/03/post` → `/blog/*/*/*`
/// - `https://shop.test/` → `/`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UrlPattern(String);

impl UrlPattern {
    /// Wrap a stored pattern without normalizing it
    #[inline]
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// The root pattern `/`
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// The pattern matching every path, `/*`
    #[inline]
    #[must_use]
    pub fn match_all() -> Self {
        Self(MATCH_ALL.to_string())
    }

    /// Normalize a URL or bare path, see [`normalize`]
    #[inline]
    #[must_use]
    pub fn normalize(url: &str) -> Self {
        normalize(url)
    }

    /// Pattern text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the pattern text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Check if pattern contains a wildcard segment
    #[inline]
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.0.contains(WILDCARD)
    }

    /// Check if pattern is in canonical form
    ///
    /// A `false` result means the normalizer fell back to the raw input.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        let p = self.0.as_str();
        p.starts_with('/')
            && !p.contains("//")
            && (p == "/" || !p.ends_with('/'))
            && !p.contains(['?', '#'])
            && !p.chars().any(char::is_whitespace)
    }

    /// Check if two patterns could match the same concrete URL, see [`overlaps`]
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self, other)
    }
}

impl Display for UrlPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UrlPattern {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for UrlPattern {
    fn from(pattern: String) -> Self {
        Self(pattern)
    }
}

impl From<&str> for UrlPattern {
    fn from(pattern: &str) -> Self {
        Self(pattern.to_string())
    }
}

impl Default for UrlPattern {
    fn default() -> Self {
        Self::root()
    }
}

/// Turn a URL or bare path into a canonical [`UrlPattern`]
///
/// - Scheme and host are stripped from full URLs; query and fragment are dropped.
/// - Input without a scheme or leading `/` whose first segment is a dotted
///   host name (`shop.test/products/1`) is read as a URL on that host. Hosts
///   without a dot, such as `localhost:3000/x`, stay part of the path.
/// - Repeated and trailing slashes are collapsed; empty input gives `/`.
/// - The first segment is kept literally. Later segments that look dynamic
///   (digits, `-`/`_`, a year, a UUID) become `*`, and so does every segment
///   below a wildcarded one.
/// - Input that already contains `*` is returned unchanged.
/// - A full URL that fails to parse is returned unchanged.
#[must_use]
pub fn normalize(url: &str) -> UrlPattern {
    let input = url.trim();

    if input.contains(WILDCARD) {
        return UrlPattern(url.to_string());
    }

    match extract_path(input) {
        Some(path) => canonical_path(&path),
        None => {
            tracing::debug!(input = url, "unparsable url, keeping raw input as pattern");
            UrlPattern(url.to_string())
        }
    }
}

/// Path portion of a full URL or bare path; `None` if a full URL is malformed
fn extract_path(input: &str) -> Option<String> {
    if has_scheme(input) {
        return Url::parse(input).ok().map(|u| u.path().to_string());
    }
    if has_host_prefix(input) {
        return Url::parse(&format!("http://{input}"))
            .ok()
            .map(|u| u.path().to_string());
    }

    let end = input.find(['?', '#']).unwrap_or(input.len());
    Some(input[..end].to_string())
}

fn has_scheme(input: &str) -> bool {
    let Some(pos) = input.find("://") else {
        return false;
    };
    let scheme = &input[..pos];
    scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// First segment is `host.name` or `host.name:port`
fn has_host_prefix(input: &str) -> bool {
    if input.starts_with('/') {
        return false;
    }
    let end = input.find(['/', '?', '#']).unwrap_or(input.len());
    let authority = &input[..end];
    let host = authority.split_once(':').map_or(authority, |(host, _)| host);

    let labels: Vec<&str> = host.split('.').collect();
    labels.len() > 1
        && labels.iter().all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && labels
            .last()
            .is_some_and(|tld| tld.starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn canonical_path(path: &str) -> UrlPattern {
    let mut out = String::with_capacity(path.len() + 1);
    let mut below_wildcard = false;

    let segments = path.split('/').map(str::trim).filter(|s| !s.is_empty());
    for (i, segment) in segments.enumerate() {
        out.push('/');
        if i > 0 && (below_wildcard || is_dynamic_segment(segment)) {
            below_wildcard = true;
            out.push(WILDCARD);
        } else {
            out.push_str(segment);
        }
    }

    if out.is_empty() {
        out.push('/');
    }
    UrlPattern(out)
}

/// Check if a segment identifies an instance rather than a resource type
#[must_use]
pub fn is_dynamic_segment(segment: &str) -> bool {
    has_identifier_chars(segment) || is_year(segment) || is_uuid(segment)
}

fn has_identifier_chars(segment: &str) -> bool {
    segment
        .chars()
        .any(|c| c.is_ascii_digit() || c == '-' || c == '_')
}

fn is_year(segment: &str) -> bool {
    segment.len() == 4 && segment.bytes().all(|b| b.is_ascii_digit())
}

fn is_uuid(segment: &str) -> bool {
    (segment.len() == 32 || segment.len() == 36) && Uuid::try_parse(segment).is_ok()
}

/// Check if two patterns could ever match the same concrete URL
///
/// Symmetric and reflexive, and biased toward reporting overlap:
/// - Equal patterns (ignoring trailing slashes) overlap; `/*` overlaps everything.
/// - Two wildcard patterns overlap if the literal prefix before the first
///   `*` of one is a prefix of the other's.
/// - A wildcard pattern overlaps a literal path if it matches the whole path
///   or an ancestor of it, each `*` standing for exactly one segment.
/// - Two literal paths overlap if one is a segment-bounded prefix of the other.
#[must_use]
pub fn overlaps(a: &UrlPattern, b: &UrlPattern) -> bool {
    let a = strip_trailing_slash(a.as_str());
    let b = strip_trailing_slash(b.as_str());

    if a == b || a == MATCH_ALL || b == MATCH_ALL {
        return true;
    }

    match (a.contains(WILDCARD), b.contains(WILDCARD)) {
        (true, true) => {
            let pa = literal_prefix(a);
            let pb = literal_prefix(b);
            pa.starts_with(pb) || pb.starts_with(pa)
        }
        (true, false) => wildcard_matches(a, b),
        (false, true) => wildcard_matches(b, a),
        (false, false) => is_path_prefix(a, b) || is_path_prefix(b, a),
    }
}

fn strip_trailing_slash(pattern: &str) -> &str {
    let stripped = pattern.trim_end_matches('/');
    if stripped.is_empty() && !pattern.is_empty() {
        "/"
    } else {
        stripped
    }
}

fn literal_prefix(pattern: &str) -> &str {
    pattern
        .find(WILDCARD)
        .map_or(pattern, |pos| &pattern[..pos])
}

fn is_path_prefix(prefix: &str, path: &str) -> bool {
    path == prefix || (path.starts_with(prefix) && path[prefix.len()..].starts_with('/'))
}

fn wildcard_matches(pattern: &str, literal: &str) -> bool {
    let body = pattern
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[^/]+");

    match Regex::new(&format!("^{body}(?:/|$)")) {
        Ok(matcher) => matcher.is_match(literal),
        Err(err) => {
            tracing::debug!(%err, pattern, "wildcard matcher failed to build, assuming overlap");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(s: &str) -> UrlPattern {
        UrlPattern::new(s)
    }

    #[test]
    fn normalize_strips_scheme_and_host() {
        assert_eq!(normalize("https://x.com/products/shoe-123").as_str(), "/products/*");
        assert_eq!(normalize("https://x.com/collections").as_str(), "/collections");
    }

    #[test]
    fn normalize_root_forms() {
        assert_eq!(normalize("https://x.com/").as_str(), "/");
        assert_eq!(normalize("https://x.com").as_str(), "/");
        assert_eq!(normalize("/").as_str(), "/");
        assert_eq!(normalize("").as_str(), "/");
        assert_eq!(normalize("   ").as_str(), "/");
    }

    #[test]
    fn normalize_wildcards_below_dynamic_segment() {
        assert_eq!(normalize("https://x.com/blog/2024/03/post").as_str(), "/blog/*/*/*");
        assert_eq!(normalize("/products/123/reviews").as_str(), "/products/*/*");
    }

    #[test]
    fn normalize_keeps_structural_segments() {
        assert_eq!(normalize("/shop/collections/summer").as_str(), "/shop/collections/summer");
        assert_eq!(normalize("/products/shoe").as_str(), "/products/shoe");
    }

    #[test]
    fn normalize_first_segment_is_literal() {
        assert_eq!(normalize("/2024/archive").as_str(), "/2024/archive");
        assert_eq!(normalize("/blue-shoe").as_str(), "/blue-shoe");
    }

    #[test]
    fn normalize_collapses_slashes() {
        assert_eq!(normalize("//products///blue-shoe//").as_str(), "/products/*");
        assert_eq!(normalize("products/").as_str(), "/products");
    }

    #[test]
    fn normalize_reads_scheme_less_host() {
        assert_eq!(normalize("shop.test/products/1").as_str(), "/products/*");
        assert_eq!(normalize("www.shop.test").as_str(), "/");
        assert_eq!(normalize("shop.test:8080/about?x=1").as_str(), "/about");
        assert_eq!(
            normalize("shop.test/products/1"),
            normalize("https://shop.test/products/1")
        );
    }

    #[test]
    fn normalize_keeps_relative_paths_without_host() {
        assert_eq!(normalize("products/shoe.html").as_str(), "/products/shoe.html");
        assert_eq!(normalize("localhost:3000/about").as_str(), "/localhost:3000/about");
        assert_eq!(normalize("v1.2/docs").as_str(), "/v1.2/docs");
    }

    #[test]
    fn normalize_drops_query_and_fragment() {
        assert_eq!(normalize("/products?page=2").as_str(), "/products");
        assert_eq!(normalize("https://x.com/about#team").as_str(), "/about");
        assert_eq!(normalize("/redirect?to=https://y.com/a").as_str(), "/redirect");
    }

    #[test]
    fn normalize_detects_uuids() {
        assert_eq!(
            normalize("/orders/abcdefab-cdef-abcd-efab-cdefabcdefab").as_str(),
            "/orders/*"
        );
        assert_eq!(normalize("/orders/abcdefabcdefabcdefabcdefabcdefab").as_str(), "/orders/*");
        assert!(!is_dynamic_segment("abcdef"));
    }

    #[test]
    fn normalize_keeps_existing_wildcards() {
        assert_eq!(normalize("/products/*/reviews").as_str(), "/products/*/reviews");
        assert_eq!(normalize("/*").as_str(), "/*");
    }

    #[test]
    fn normalize_falls_back_on_malformed_url() {
        let raw = "http://[::1/products/1";
        let pattern = normalize(raw);
        assert_eq!(pattern.as_str(), raw);
        assert!(!pattern.is_canonical());
    }

    #[test]
    fn canonical_outputs_are_canonical() {
        assert!(normalize("https://x.com/products/1").is_canonical());
        assert!(normalize("/").is_canonical());
        assert!(UrlPattern::match_all().is_canonical());
        assert!(!p("/products/").is_canonical());
        assert!(!p("products").is_canonical());
    }

    #[test]
    fn overlap_root_is_not_a_prefix_of_everything() {
        assert!(!overlaps(&p("/"), &p("/products")));
        assert!(overlaps(&p("/"), &p("/")));
    }

    #[test]
    fn overlap_wildcard_against_literal() {
        assert!(overlaps(&p("/products/*"), &p("/products/shoe")));
        assert!(overlaps(&p("/products/*/reviews"), &p("/products/123/reviews")));
        assert!(overlaps(&p("/products/*"), &p("/products/shoe/reviews")));
        assert!(!overlaps(&p("/products/*"), &p("/products")));
        assert!(!overlaps(&p("/products/*"), &p("/collections/shoe")));
        assert!(!overlaps(&p("/products/*/reviews"), &p("/products/123/specs")));
    }

    #[test]
    fn overlap_both_wildcards_uses_prefixes() {
        assert!(overlaps(&p("/products/*"), &p("/products/*")));
        assert!(overlaps(&p("/products/*"), &p("/products/*/reviews")));
        // nested prefixes count as overlap even when no concrete URL matches both
        assert!(overlaps(&p("/a/*/c"), &p("/a/b/*")));
        assert!(!overlaps(&p("/products/*"), &p("/collections/*")));
    }

    #[test]
    fn overlap_literals_are_segment_bounded() {
        assert!(overlaps(&p("/a"), &p("/a/b")));
        assert!(!overlaps(&p("/a"), &p("/ab")));
        assert!(overlaps(&p("/about/"), &p("/about")));
    }

    #[test]
    fn overlap_match_all() {
        assert!(overlaps(&UrlPattern::match_all(), &p("/")));
        assert!(overlaps(&p("/checkout"), &UrlPattern::match_all()));
    }

    #[test]
    fn overlap_opaque_patterns_compare_as_literals() {
        let raw = p("http://[::1/products/1");
        assert!(overlaps(&raw, &raw.clone()));
        assert!(!overlaps(&raw, &p("/products/1")));
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(
            url in "(https?://[a-z]{1,8}\\.com)?(/[a-zA-Z0-9_-]{0,8}){0,5}/?(\\?[a-z=]{0,6})?"
        ) {
            let once = normalize(&url);
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_normalize_idempotent_on_noise(url in "[ a-zA-Z0-9/:._?#*\\[\\]-]{0,40}") {
            let once = normalize(&url);
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_overlap_symmetric(
            a in proptest::collection::vec("(products|blog|shop|[*]|reviews|a|ab)", 0..4),
            b in proptest::collection::vec("(products|blog|shop|[*]|reviews|a|ab)", 0..4),
        ) {
            let a = p(&format!("/{}", a.join("/")));
            let b = p(&format!("/{}", b.join("/")));
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
            prop_assert!(overlaps(&a, &a));
        }
    }
}
