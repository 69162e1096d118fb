//! Selector canonicalization
//!
//! Provides [`CanonicalSelector`], a CSS selector rewritten so that cosmetic
//! differences (spacing, tag-name case, class order) disappear before the
//! selector is hashed into a [`TargetKey`](crate::TargetKey).
//!
//! No CSS grammar validation happens here. Malformed selectors still
//! canonicalize to something stable.

use std::fmt::{self, Display, Formatter};

/// CSS selector in canonical form
///
/// The empty string is the "no selector" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CanonicalSelector(String);

impl CanonicalSelector {
    /// The "no selector" sentinel
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Canonicalize a raw selector, see [`canonicalize`]
    #[inline]
    #[must_use]
    pub fn new(selector: &str) -> Self {
        canonicalize(selector)
    }

    /// Selector text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check for the "no selector" sentinel
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for CanonicalSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalSelector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a CSS selector for stable comparison
///
/// - Whitespace is trimmed and collapsed to single spaces.
/// - The leading tag name of each compound is lower-cased.
/// - The selector is split on `>`, `+`, `~` and `,` outside of brackets,
///   parentheses and quotes; combinators are kept with canonical spacing.
/// - Class tokens of each compound are sorted. A whitespace-separated token
///   made only of classes is folded into a preceding type compound, so
///   `DIV.b.a` and `div .a.b` both become `div.a.b`. Class-only compounds
///   never merge: `.a .b`, `.b .a` and `.a.b` stay distinct.
#[must_use]
pub fn canonicalize(selector: &str) -> CanonicalSelector {
    let collapsed = collapse_whitespace(selector);
    if collapsed.is_empty() {
        return CanonicalSelector::empty();
    }

    let mut out = String::with_capacity(collapsed.len() + 8);
    for (segment, combinator) in split_top_level(&collapsed, is_combinator) {
        out.push_str(&canonical_segment(segment.trim()));
        match combinator {
            Some(',') => out.push_str(", "),
            Some(c) => {
                out.push(' ');
                out.push(c);
                out.push(' ');
            }
            None => {}
        }
    }

    CanonicalSelector(collapse_whitespace(&out))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_combinator(c: char) -> bool {
    matches!(c, '>' | '+' | '~' | ',')
}

/// Split on separator characters that sit outside `[]`, `()` and quotes
///
/// Each piece is paired with the separator that ended it.
fn split_top_level(s: &str, is_sep: impl Fn(char) -> bool) -> Vec<(String, Option<char>)> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(escaped) = chars.next() {
                current.push(escaped);
            }
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            current.push(c);
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && is_sep(c) => {
                pieces.push((std::mem::take(&mut current), Some(c)));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    pieces.push((current, None));
    pieces
}

fn canonical_segment(segment: &str) -> String {
    let mut compounds: Vec<(String, Vec<String>)> = Vec::new();

    for (token, _) in split_top_level(segment, |c| c == ' ') {
        if token.is_empty() {
            continue;
        }
        let (head, classes) = split_classes(&token);
        match compounds.last_mut() {
            Some((previous_head, previous)) if head.is_empty() && is_type_head(previous_head) => {
                previous.extend(classes);
            }
            _ => compounds.push((lowercase_tag(&head), classes)),
        }
    }

    compounds
        .into_iter()
        .map(|(head, mut classes)| {
            classes.sort();
            head + &classes.concat()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Separate top-level `.class` tokens from the rest of a compound
fn split_classes(token: &str) -> (String, Vec<String>) {
    let mut head = String::new();
    let mut classes = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = token.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            head.push(c);
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                let mut class = String::from('.');
                while let Some(&next) = chars.peek() {
                    if next == '\\' {
                        class.push(next);
                        chars.next();
                        if let Some(escaped) = chars.next() {
                            class.push(escaped);
                        }
                    } else if is_ident_char(next) {
                        class.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if class.len() > 1 {
                    classes.push(class);
                    continue;
                }
            }
            _ => {}
        }
        head.push(c);
    }

    (head, classes)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Compound head that starts with a type selector
fn is_type_head(head: &str) -> bool {
    head.starts_with(|c: char| c.is_ascii_alphabetic())
}

fn lowercase_tag(head: &str) -> String {
    if !head.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return head.to_string();
    }
    let tag_len = head
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(head.len());
    format!("{}{}", head[..tag_len].to_ascii_lowercase(), &head[tag_len..])
}
