//! Fixed-interval background job scheduling.

use crate::capability::domain::JobSpec;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

/// Handles of the running job loops.
#[derive(Debug, Default)]
pub struct JobsHandle {
    loops: Vec<JoinHandle<()>>,
}

impl JobsHandle {
    /// Returns the number of running job loops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    /// Returns whether no job loop is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Stops every job loop. A run already in progress finishes on its own.
    pub fn shutdown(self) {
        for job_loop in self.loops {
            job_loop.abort();
        }
    }
}

/// Starts background jobs on independent periodic timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundJobScheduler;

impl BackgroundJobScheduler {
    /// Creates a scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Starts every job.
    ///
    /// The first run of a job happens one interval after this call, then
    /// once per interval. Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when a job has already been started.
    #[must_use]
    pub fn start(&self, jobs: &[Arc<JobSpec>]) -> JobsHandle {
        let loops = jobs
            .iter()
            .map(|job| {
                job.mark_started();
                info!(
                    job = job.implementation(),
                    interval_secs = job.interval().as_secs(),
                    "background job started"
                );
                tokio::spawn(run_job(Arc::clone(job)))
            })
            .collect();
        JobsHandle { loops }
    }
}

async fn run_job(job: Arc<JobSpec>) {
    let period = job.interval();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let action = job.action();
        match tokio::spawn(async move { action.run().await }).await {
            Ok(Ok(())) => debug!(job = job.implementation(), "background job run completed"),
            Ok(Err(err)) => warn!(
                job = job.implementation(),
                error = %err,
                "background job run failed"
            ),
            Err(join_error) if join_error.is_panic() => {
                warn!(job = job.implementation(), "background job run panicked");
            }
            Err(_) => break,
        }
    }
}
