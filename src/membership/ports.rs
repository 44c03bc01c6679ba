//! Port contracts for roster access.

use super::{CollaboratorResult, MemberRecord, MembershipStatus};
use async_trait::async_trait;

/// External directory holding the authoritative club roster.
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// Fetches the full roster.
    ///
    /// # Errors
    ///
    /// Returns [`super::CollaboratorError::RosterUnavailable`] when the
    /// directory cannot be reached.
    async fn fetch_roster(&self) -> CollaboratorResult<Vec<MemberRecord>>;
}

/// Membership questions asked by capabilities.
#[async_trait]
pub trait MembershipLookup: Send + Sync {
    /// Returns the status of `handle`. Never fails; an unreachable roster
    /// yields [`MembershipStatus::Unknown`].
    async fn status(&self, handle: &str) -> MembershipStatus;

    /// Replaces the cached roster with a fresh copy and returns its size.
    ///
    /// # Errors
    ///
    /// Returns the directory failure; the previous copy is kept.
    async fn refresh(&self) -> CollaboratorResult<usize>;
}
