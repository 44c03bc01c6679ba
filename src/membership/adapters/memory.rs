//! In-memory roster directory for tests and offline tooling.

use crate::membership::{CollaboratorError, CollaboratorResult, MemberRecord, MembershipDirectory};
use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory roster directory.
///
/// Clones share the same roster, so a test can update or break the
/// directory after handing it to a cache.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipDirectory {
    records: Arc<RwLock<Vec<MemberRecord>>>,
    unavailable: Arc<AtomicBool>,
    fetches: Arc<AtomicUsize>,
}

impl InMemoryMembershipDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding `handles`.
    #[must_use]
    pub fn with_members<'a>(handles: impl IntoIterator<Item = &'a str>) -> Self {
        let directory = Self::new();
        if let Ok(mut records) = directory.records.write() {
            records.extend(handles.into_iter().map(MemberRecord::new));
        }
        directory
    }

    /// Replaces the roster.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::RosterUnavailable`] when the roster lock
    /// is poisoned.
    pub fn set_members<'a>(
        &self,
        handles: impl IntoIterator<Item = &'a str>,
    ) -> CollaboratorResult<()> {
        let mut records = self.records.write().map_err(|err| {
            CollaboratorError::roster_unavailable(io::Error::other(err.to_string()))
        })?;
        *records = handles.into_iter().map(MemberRecord::new).collect();
        Ok(())
    }

    /// Makes later fetches fail, or succeed again.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of fetch attempts, failed ones included.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MembershipDirectory for InMemoryMembershipDirectory {
    async fn fetch_roster(&self) -> CollaboratorResult<Vec<MemberRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CollaboratorError::roster_unavailable(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "roster directory unreachable",
            )));
        }
        let records = self.records.read().map_err(|err| {
            CollaboratorError::roster_unavailable(io::Error::other(err.to_string()))
        })?;
        Ok(records.clone())
    }
}
