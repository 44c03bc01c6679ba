//! Host port for the chat platform the bot runs on.

use crate::capability::domain::{
    ChannelId, CommandSurface, GuildId, InteractionId, MessageId, PanelSpec, RoleId, UserId,
};
use crate::interaction::{MessageContent, MessageRef, Reply};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for host operations.
pub type ChatHostResult<T> = Result<T, ChatHostError>;

/// Chat platform operations used by the orchestrator and by capabilities.
///
/// Connectivity, reconnection, and rate limiting belong to the host.
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Resumes listening to the components of a previously sent message.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::NotFound`] when the panel message no longer
    /// exists.
    async fn attach_panel(&self, panel: &PanelSpec) -> ChatHostResult<()>;

    /// Opens the connection. The host reports readiness through the `ready`
    /// hook once connected.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Unavailable`] when the platform cannot be
    /// reached.
    async fn connect(&self) -> ChatHostResult<()>;

    /// Installs the command surface for one server.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Rejected`] when the platform refuses the
    /// surface.
    async fn sync_commands(&self, guild: GuildId, surface: &CommandSurface) -> ChatHostResult<()>;

    /// Sends a message to a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::NotFound`] when the channel does not exist.
    async fn send_message(
        &self,
        channel: ChannelId,
        content: &MessageContent,
    ) -> ChatHostResult<MessageId>;

    /// Replaces the content of a message the bot sent.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::NotFound`] when the message does not exist.
    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: &MessageContent,
    ) -> ChatHostResult<()>;

    /// Fetches a message snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::NotFound`] when the message does not exist.
    async fn fetch_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> ChatHostResult<MessageRef>;

    /// Grants a role to a member.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Rejected`] when the bot may not manage the
    /// role.
    async fn add_role(&self, guild: GuildId, user: UserId, role: RoleId) -> ChatHostResult<()>;

    /// Returns the bot's own user identifier.
    fn current_user(&self) -> UserId;

    /// Returns the last measured gateway latency.
    fn latency(&self) -> Duration;
}

/// Two-phase interaction response operations.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    /// Sends the initial response to an interaction.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Rejected`] when the interaction was already
    /// answered or has expired.
    async fn respond(&self, interaction: InteractionId, reply: &Reply) -> ChatHostResult<()>;

    /// Acknowledges an interaction without content, reserving a follow-up.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Rejected`] when the interaction was already
    /// answered or has expired.
    async fn defer(&self, interaction: InteractionId, ephemeral: bool) -> ChatHostResult<()>;

    /// Sends a follow-up message to an acknowledged interaction.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Rejected`] when the interaction was never
    /// acknowledged.
    async fn follow_up(&self, interaction: InteractionId, reply: &Reply) -> ChatHostResult<()>;
}

/// Errors returned by host implementations.
#[derive(Debug, Clone, Error)]
pub enum ChatHostError {
    /// The referenced channel, message, or member does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The platform refused the request.
    #[error("rejected by host: {0}")]
    Rejected(String),

    /// The platform could not be reached.
    #[error("host unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChatHostError {
    /// Wraps a transport or runtime failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
