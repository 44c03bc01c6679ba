//! Periodic roster refresh.

use crate::capability::domain::{
    CapabilityDraft, CapabilityEntry, CapabilityKind, JobDraft, JobError,
};
use crate::capability::ports::job_fn;
use crate::membership::MembershipLookup;
use std::sync::Arc;
use tracing::debug;

/// Builds the `roster_refresh` job, which refetches the membership roster
/// on the configured interval so lookups rarely wait on the directory.
#[must_use]
pub fn roster_refresh(roster: Arc<dyn MembershipLookup>) -> CapabilityEntry {
    CapabilityEntry::with_builder(
        "roster_refresh",
        "Refreshes the cached membership roster.",
        CapabilityKind::BackgroundJob,
        move |bot| {
            let lookup = Arc::clone(&roster);
            CapabilityDraft::BackgroundJob(
                JobDraft::new()
                    .every_secs(bot.config().jobs.roster_refresh_secs)
                    .action(job_fn(move || {
                        let members = Arc::clone(&lookup);
                        async move {
                            let count = members.refresh().await.map_err(JobError::wrap)?;
                            debug!(members = count, "roster refresh run finished");
                            Ok(())
                        }
                    })),
            )
        },
    )
}
