//! Start-up lifecycle states of the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One-directional start-up state of the capability orchestrator.
///
/// The sequence never loops: each state may only advance to the state
/// immediately after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Registry not yet scanned.
    Unloaded,
    /// Every registration satisfied its contract.
    Validated,
    /// Command surface and hook bindings are built.
    Composed,
    /// Ready to ask the host to connect.
    AwaitingConnect,
    /// Every persistent panel is live again.
    PanelsAttached,
    /// The host holds an open connection.
    Connected,
    /// The command surface has been pushed to the host.
    Synced,
    /// Background jobs are running.
    JobsRunning,
}

impl LifecycleState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Validated => "validated",
            Self::Composed => "composed",
            Self::AwaitingConnect => "awaiting_connect",
            Self::PanelsAttached => "panels_attached",
            Self::Connected => "connected",
            Self::Synced => "synced",
            Self::JobsRunning => "jobs_running",
        }
    }

    /// Returns the state that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Unloaded => Some(Self::Validated),
            Self::Validated => Some(Self::Composed),
            Self::Composed => Some(Self::AwaitingConnect),
            Self::AwaitingConnect => Some(Self::PanelsAttached),
            Self::PanelsAttached => Some(Self::Connected),
            Self::Connected => Some(Self::Synced),
            Self::Synced => Some(Self::JobsRunning),
            Self::JobsRunning => None,
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns whether inbound dispatch may be routed in this state.
    #[must_use]
    pub fn accepts_dispatch(self) -> bool {
        self >= Self::Composed
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
