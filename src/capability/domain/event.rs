//! Host lifecycle hooks, events, and handler bindings.

use super::{ChannelId, MessageId, ParseHostHookError, UserId};
use crate::capability::ports::EventAction;
use crate::interaction::{MemberRef, MessageRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Finite set of lifecycle hooks the host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostHook {
    /// The host finished connecting and is ready.
    Ready,
    /// A member joined the server.
    MemberJoin,
    /// A member left the server.
    MemberRemove,
    /// A message was posted.
    MessageCreate,
    /// A message was deleted.
    MessageDelete,
    /// A reaction was added to a message.
    ReactionAdd,
}

impl HostHook {
    /// Returns the canonical hook name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::MemberJoin => "member_join",
            Self::MemberRemove => "member_remove",
            Self::MessageCreate => "message_create",
            Self::MessageDelete => "message_delete",
            Self::ReactionAdd => "reaction_add",
        }
    }
}

impl fmt::Display for HostHook {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HostHook {
    type Error = ParseHostHookError;

    /// Parses a hook name, accepting an optional `on_` prefix.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        let name = normalized.strip_prefix("on_").unwrap_or(&normalized);
        match name {
            "ready" => Ok(Self::Ready),
            "member_join" => Ok(Self::MemberJoin),
            "member_remove" => Ok(Self::MemberRemove),
            "message_create" | "message" => Ok(Self::MessageCreate),
            "message_delete" => Ok(Self::MessageDelete),
            "reaction_add" => Ok(Self::ReactionAdd),
            _ => Err(ParseHostHookError(value.to_owned())),
        }
    }
}

/// Event delivered by the host to a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host is ready.
    Ready,
    /// A member joined.
    MemberJoin(MemberRef),
    /// A member left.
    MemberRemove(UserId),
    /// A message was posted.
    MessageCreate(MessageRef),
    /// A message was deleted.
    MessageDelete {
        /// Channel that held the message.
        channel: ChannelId,
        /// Deleted message.
        message: MessageId,
    },
    /// A reaction was added.
    ReactionAdd {
        /// Channel holding the message.
        channel: ChannelId,
        /// Reacted message.
        message: MessageId,
        /// Reacting user.
        user: UserId,
        /// Emoji name or markup.
        emoji: String,
    },
}

impl HostEvent {
    /// Returns the hook this event is delivered to.
    #[must_use]
    pub const fn hook(&self) -> HostHook {
        match self {
            Self::Ready => HostHook::Ready,
            Self::MemberJoin(_) => HostHook::MemberJoin,
            Self::MemberRemove(_) => HostHook::MemberRemove,
            Self::MessageCreate(_) => HostHook::MessageCreate,
            Self::MessageDelete { .. } => HostHook::MessageDelete,
            Self::ReactionAdd { .. } => HostHook::ReactionAdd,
        }
    }
}

/// Validated binding of an event handler to one hook.
#[derive(Clone)]
pub struct EventBinding {
    implementation: String,
    hook: HostHook,
    action: Arc<dyn EventAction>,
}

impl EventBinding {
    /// Creates an event binding.
    #[must_use]
    pub fn new(
        implementation: impl Into<String>,
        hook: HostHook,
        action: Arc<dyn EventAction>,
    ) -> Self {
        Self {
            implementation: implementation.into(),
            hook,
            action,
        }
    }

    /// Returns the implementation identifier.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Returns the bound hook.
    #[must_use]
    pub const fn hook(&self) -> HostHook {
        self.hook
    }

    /// Returns the bound action.
    #[must_use]
    pub fn action(&self) -> Arc<dyn EventAction> {
        Arc::clone(&self.action)
    }
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EventBinding")
            .field("implementation", &self.implementation)
            .field("hook", &self.hook)
            .finish_non_exhaustive()
    }
}
