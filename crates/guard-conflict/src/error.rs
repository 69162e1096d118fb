//! Error types for the conflict guard
//!
//! The pure checks never fail on malformed input. Errors exist only for:
//! - Publish gates that found conflicts
//! - Invalid guard configuration

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detector::format_conflicts;
use crate::target::ActiveTarget;

/// Machine-readable code carried by a conflict error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictCode {
    /// Candidate collides with at least one running experiment
    TargetConflict,
}

impl ConflictCode {
    /// Code as sent to API clients
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TargetConflict => "TARGET_CONFLICT",
        }
    }
}

impl fmt::Display for ConflictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main guard error type
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// Candidate collides with running experiments
    #[error("{message}")]
    Conflict {
        /// Machine-readable code
        code: ConflictCode,
        /// Every conflicting active target
        conflicts: Vec<ActiveTarget>,
        /// Human-readable summary
        message: String,
    },

    /// Configuration could not be parsed or is invalid
    #[error("configuration error: {0}")]
    Config(String),
}

impl GuardError {
    /// Create conflict error with the default message
    #[must_use]
    pub fn conflict(conflicts: Vec<ActiveTarget>) -> Self {
        let message = format!(
            "Target conflicts with {} active experiment(s)",
            conflicts.len()
        );
        Self::conflict_with_message(conflicts, message)
    }

    /// Create conflict error with a caller-supplied message
    #[must_use]
    pub fn conflict_with_message(conflicts: Vec<ActiveTarget>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: ConflictCode::TargetConflict,
            conflicts,
            message: message.into(),
        }
    }

    /// Check if error carries conflicts
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Machine-readable code, if any
    #[inline]
    #[must_use]
    pub fn code(&self) -> Option<ConflictCode> {
        match self {
            Self::Conflict { code, .. } => Some(*code),
            Self::Config(_) => None,
        }
    }

    /// Conflicting targets (empty for non-conflict errors)
    #[inline]
    #[must_use]
    pub fn conflicts(&self) -> &[ActiveTarget] {
        match self {
            Self::Conflict { conflicts, .. } => conflicts,
            Self::Config(_) => &[],
        }
    }

    /// Message followed by one line per conflict
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Conflict {
                conflicts, message, ..
            } => format!("{message}\n{}", format_conflicts(conflicts)),
            Self::Config(_) => self.to_string(),
        }
    }
}

impl From<toml::de::Error> for GuardError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
