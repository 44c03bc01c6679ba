//! Host entities delivered with interactions and events.

use super::Embed;
use crate::capability::domain::{
    ChannelId, ContextTargetKind, MessageId, RoleId, UserId,
};
use serde::{Deserialize, Serialize};

/// Snapshot of a server member as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    /// User identifier.
    pub user: UserId,
    /// Unique account handle.
    pub handle: String,
    /// Name shown in the server.
    pub display_name: String,
    /// Roles the member currently holds.
    #[serde(default)]
    pub roles: Vec<RoleId>,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

impl MemberRef {
    /// Creates a member snapshot without roles.
    #[must_use]
    pub fn new(user: UserId, handle: impl Into<String>) -> Self {
        let account = handle.into();
        Self {
            user,
            display_name: account.clone(),
            handle: account,
            roles: Vec::new(),
            bot: false,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Adds a held role.
    #[must_use]
    pub fn with_role(mut self, role: RoleId) -> Self {
        self.roles.push(role);
        self
    }

    /// Returns whether the member holds `role`.
    #[must_use]
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    /// Returns the host mention markup for the member.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user)
    }
}

/// Snapshot of a message as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    /// Channel holding the message.
    pub channel: ChannelId,
    /// Message identifier.
    pub id: MessageId,
    /// Author of the message.
    pub author: UserId,
    /// Plain text content.
    #[serde(default)]
    pub content: String,
    /// Embeds attached to the message.
    #[serde(default)]
    pub embeds: Vec<Embed>,
}

impl MessageRef {
    /// Creates a text message snapshot.
    #[must_use]
    pub fn new(
        channel: ChannelId,
        id: MessageId,
        author: UserId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            id,
            author,
            content: content.into(),
            embeds: Vec::new(),
        }
    }
}

/// Entity a context action was invoked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextTarget {
    /// A right-clicked message.
    Message(MessageRef),
    /// A right-clicked member.
    User(MemberRef),
}

impl ContextTarget {
    /// Returns the kind of entity targeted.
    #[must_use]
    pub const fn kind(&self) -> ContextTargetKind {
        match self {
            Self::Message(_) => ContextTargetKind::Message,
            Self::User(_) => ContextTargetKind::User,
        }
    }
}
