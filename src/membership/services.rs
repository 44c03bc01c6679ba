//! Time-bounded roster cache.

use super::domain::normalize_handle;
use super::{
    CollaboratorResult, MemberRecord, MembershipDirectory, MembershipLookup, MembershipStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct RosterSnapshot {
    handles: HashSet<String>,
    fetched_at: DateTime<Utc>,
}

impl RosterSnapshot {
    fn status(&self, handle: &str) -> MembershipStatus {
        if self.handles.contains(handle) {
            MembershipStatus::Member
        } else {
            MembershipStatus::NotMember
        }
    }
}

/// Roster lookup that refetches the directory once its copy is older than
/// the configured time-to-live.
///
/// Reads share the cache; a refresh swaps it under the write lock, so no
/// lookup observes a half-built roster.
pub struct CachedMembershipRoster<D, C>
where
    D: MembershipDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    directory: Arc<D>,
    clock: Arc<C>,
    ttl: TimeDelta,
    cache: RwLock<Option<RosterSnapshot>>,
}

impl<D, C> CachedMembershipRoster<D, C>
where
    D: MembershipDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an empty cache. The first lookup fetches the roster.
    #[must_use]
    pub fn new(directory: Arc<D>, clock: Arc<C>, ttl: Duration) -> Self {
        Self {
            directory,
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            cache: RwLock::new(None),
        }
    }

    fn is_fresh(&self, snapshot: &RosterSnapshot) -> bool {
        self.clock.utc().signed_duration_since(snapshot.fetched_at) < self.ttl
    }

    async fn cached_status(&self, handle: &str) -> Option<MembershipStatus> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|snapshot| self.is_fresh(snapshot))
            .map(|snapshot| snapshot.status(handle))
    }
}

#[async_trait]
impl<D, C> MembershipLookup for CachedMembershipRoster<D, C>
where
    D: MembershipDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    async fn status(&self, handle: &str) -> MembershipStatus {
        let normalized = normalize_handle(handle);
        if let Some(status) = self.cached_status(&normalized).await {
            return status;
        }

        match self.refresh().await {
            Ok(_) => self
                .cached_status(&normalized)
                .await
                .unwrap_or(MembershipStatus::Unknown),
            Err(err) => {
                warn!(handle = %normalized, error = %err, "membership could not be checked");
                MembershipStatus::Unknown
            }
        }
    }

    async fn refresh(&self) -> CollaboratorResult<usize> {
        let records = self.directory.fetch_roster().await?;
        let handles: HashSet<String> = records
            .iter()
            .map(MemberRecord::handle)
            .map(str::to_owned)
            .collect();
        let count = handles.len();
        let mut cache = self.cache.write().await;
        *cache = Some(RosterSnapshot {
            handles,
            fetched_at: self.clock.utc(),
        });
        info!(members = count, "membership roster refreshed");
        debug!(ttl_secs = self.ttl.num_seconds(), "roster cache reset");
        Ok(count)
    }
}

impl<D, C> fmt::Debug for CachedMembershipRoster<D, C>
where
    D: MembershipDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CachedMembershipRoster")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
