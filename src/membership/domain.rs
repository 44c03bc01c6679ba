//! Roster records, membership status, and collaborator errors.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Failure of an external service a capability depends on.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    /// The membership roster could not be fetched.
    #[error("membership roster unavailable: {0}")]
    RosterUnavailable(Arc<dyn Error + Send + Sync>),
}

impl CollaboratorError {
    /// Wraps a roster fetch failure.
    pub fn roster_unavailable(err: impl Error + Send + Sync + 'static) -> Self {
        Self::RosterUnavailable(Arc::new(err))
    }
}

/// One entry of the club roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    handle: String,
    /// Name the member registered with, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_name: Option<String>,
}

impl MemberRecord {
    /// Creates a record for `handle`. The handle is normalised.
    #[must_use]
    pub fn new(handle: &str) -> Self {
        Self {
            handle: normalize_handle(handle),
            registered_name: None,
        }
    }

    /// Sets the registered name.
    #[must_use]
    pub fn with_registered_name(mut self, name: impl Into<String>) -> Self {
        self.registered_name = Some(name.into());
        self
    }

    /// Returns the normalised handle.
    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }
}

/// Whether a handle appears on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// The handle is on the roster.
    Member,
    /// The roster was read and the handle is absent.
    NotMember,
    /// The roster could not be read.
    Unknown,
}

impl MembershipStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::NotMember => "not_member",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the sentence shown to users about `subject`.
    #[must_use]
    pub fn describe(self, subject: &str) -> String {
        match self {
            Self::Member => format!("{subject} is a registered club member."),
            Self::NotMember => format!("{subject} is not on the club roster."),
            Self::Unknown => format!(
                "Membership of {subject} could not be checked right now. Please try again later."
            ),
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Normalises a handle for roster comparison: trimmed, without a leading
/// `@`, lowercase.
#[must_use]
pub fn normalize_handle(handle: &str) -> String {
    let trimmed = handle.trim();
    trimmed
        .strip_prefix('@')
        .unwrap_or(trimmed)
        .to_lowercase()
}
