//! Content-addressed identity keys
//!
//! Provides [`TargetKey`], a 32-byte BLAKE3 digest of a canonical selector,
//! and [`RoleKey`], the normalized form of a semantic role label. Conflict
//! checks compare these keys, never raw selector or role text.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::selector::{canonicalize, CanonicalSelector};

/// Prefix carried by every [`RoleKey`]
pub const ROLE_PREFIX: &str = "role:";

/// Hex length of a rendered [`TargetKey`]
const KEY_HEX_LEN: usize = 64;

/// BLAKE3 digest of a canonical selector
///
/// Stored in snapshots as 64 lowercase hex characters. Two selectors that
/// canonicalize equally always share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetKey([u8; 32]);

impl TargetKey {
    /// Hash a canonical selector
    #[inline]
    #[must_use]
    pub fn from_canonical(selector: &CanonicalSelector) -> Self {
        Self(*blake3::hash(selector.as_str().as_bytes()).as_bytes())
    }

    /// Canonicalize and hash a raw selector
    ///
    /// Returns `None` for a blank selector.
    #[must_use]
    pub fn for_selector(selector: &str) -> Option<Self> {
        let canonical = canonicalize(selector);
        (!canonical.is_empty()).then(|| Self::from_canonical(&canonical))
    }
}

impl Display for TargetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for TargetKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != KEY_HEX_LEN {
            return Err(KeyError::InvalidLength { actual: s.len() });
        }
        let mut digest = [0u8; 32];
        hex::decode_to_slice(s, &mut digest)?;
        Ok(Self(digest))
    }
}

impl Serialize for TargetKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TargetKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalized semantic role, stored as `role:<lowercased-trimmed-role>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleKey(String);

impl RoleKey {
    /// Normalize a role label
    ///
    /// Returns `None` for a blank role.
    #[must_use]
    pub fn for_role(role: &str) -> Option<Self> {
        let role = role.trim();
        (!role.is_empty()).then(|| Self(format!("{ROLE_PREFIX}{}", role.to_lowercase())))
    }

    /// Key text, including the `role:` prefix
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Role label without the `role:` prefix
    #[inline]
    #[must_use]
    pub fn role(&self) -> &str {
        self.0.strip_prefix(ROLE_PREFIX).unwrap_or(&self.0)
    }
}

impl Display for RoleKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity keys of one target; either, both or neither may be present
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetKeys {
    /// Hash of the canonical selector
    pub target_key: Option<TargetKey>,
    /// Normalized role
    pub role_key: Option<RoleKey>,
}

impl TargetKeys {
    /// Check if neither key is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target_key.is_none() && self.role_key.is_none()
    }
}

/// Derive identity keys from an optional selector and optional role
#[must_use]
pub fn keys_for(selector: Option<&str>, role: Option<&str>) -> TargetKeys {
    TargetKeys {
        target_key: selector.and_then(TargetKey::for_selector),
        role_key: role.and_then(RoleKey::for_role),
    }
}

/// Stored target key that cannot be read back
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Key text is not 64 characters long
    #[error("target key must be 64 hex characters, got {actual}")]
    InvalidLength {
        /// Length of the rejected text
        actual: usize,
    },

    /// Key text contains non-hex characters
    #[error("target key is not hex: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
