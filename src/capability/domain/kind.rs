//! Capability kinds.

use super::ParseCapabilityKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of behaviour unit a capability implementation provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Top-level slash command.
    Command,
    /// Named group of slash subcommands.
    Group,
    /// Right-click action on a message or a user.
    ContextAction,
    /// Listener bound to one host lifecycle hook.
    EventHandler,
    /// Interactive components attached to a persisted message.
    PersistentPanel,
    /// Fixed-interval periodic job.
    BackgroundJob,
}

impl CapabilityKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Group => "group",
            Self::ContextAction => "context_action",
            Self::EventHandler => "event_handler",
            Self::PersistentPanel => "persistent_panel",
            Self::BackgroundJob => "background_job",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CapabilityKind {
    type Error = ParseCapabilityKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "command" => Ok(Self::Command),
            "group" => Ok(Self::Group),
            "context_action" => Ok(Self::ContextAction),
            "event_handler" => Ok(Self::EventHandler),
            "persistent_panel" => Ok(Self::PersistentPanel),
            "background_job" => Ok(Self::BackgroundJob),
            _ => Err(ParseCapabilityKindError(value.to_owned())),
        }
    }
}
