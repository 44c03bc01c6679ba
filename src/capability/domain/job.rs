//! Background job specifications.

use crate::capability::ports::JobAction;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Result type for background job runs.
pub type JobResult = Result<(), JobError>;

/// Failure of one background job run. Logged by the scheduler, never
/// propagated.
#[derive(Debug, Clone, Error)]
pub enum JobError {
    /// The run failed with a message.
    #[error("{0}")]
    Message(String),

    /// The run failed with an underlying error.
    #[error("{0}")]
    Source(Arc<dyn Error + Send + Sync>),
}

impl JobError {
    /// Wraps an underlying error.
    pub fn wrap(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Source(Arc::new(err))
    }
}

/// Validated fixed-interval background job.
pub struct JobSpec {
    implementation: String,
    interval: Duration,
    action: Arc<dyn JobAction>,
    started: AtomicBool,
}

impl JobSpec {
    /// Creates a job that has not been started.
    #[must_use]
    pub fn new(
        implementation: impl Into<String>,
        interval: Duration,
        action: Arc<dyn JobAction>,
    ) -> Self {
        Self {
            implementation: implementation.into(),
            interval,
            action,
            started: AtomicBool::new(false),
        }
    }

    /// Returns the implementation identifier.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Returns the period between runs.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the job action.
    #[must_use]
    pub fn action(&self) -> Arc<dyn JobAction> {
        Arc::clone(&self.action)
    }

    /// Returns whether the job has been started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Flips the started flag.
    ///
    /// # Panics
    ///
    /// Panics when the job was already started; starting a job twice is a
    /// programming error.
    pub fn mark_started(&self) {
        let already_started = self.started.swap(true, Ordering::AcqRel);
        assert!(
            !already_started,
            "background job '{}' was started twice",
            self.implementation
        );
    }
}

impl fmt::Debug for JobSpec {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("JobSpec")
            .field("implementation", &self.implementation)
            .field("interval", &self.interval)
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}
