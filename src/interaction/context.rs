//! Shared construction context and per-invocation context.

use super::{InvocationError, InvocationResult, MemberRef, Reply, ResponseHandle};
use crate::capability::domain::{
    ChannelId, CommandSurface, GuildId, InteractionId, InvocationId, RoleId,
};
use crate::capability::ports::ChatHost;
use crate::config::BotConfig;
use std::fmt;
use std::sync::Arc;

/// Host handle and configuration shared by every capability.
///
/// Both parts are read-only for the lifetime of the process.
#[derive(Clone)]
pub struct BotContext {
    host: Arc<dyn ChatHost>,
    config: Arc<BotConfig>,
}

impl BotContext {
    /// Creates a shared context.
    #[must_use]
    pub fn new(host: Arc<dyn ChatHost>, config: Arc<BotConfig>) -> Self {
        Self { host, config }
    }

    /// Returns the host handle.
    #[must_use]
    pub fn host(&self) -> &Arc<dyn ChatHost> {
        &self.host
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BotConfig {
        &self.config
    }
}

impl fmt::Debug for BotContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BotContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Inbound interaction metadata supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// Host interaction identifier.
    pub id: InteractionId,
    /// Server the interaction happened in.
    pub guild: GuildId,
    /// Channel the interaction happened in.
    pub channel: ChannelId,
    /// Member who triggered the interaction.
    pub invoker: MemberRef,
}

impl Interaction {
    /// Creates interaction metadata.
    #[must_use]
    pub const fn new(
        id: InteractionId,
        guild: GuildId,
        channel: ChannelId,
        invoker: MemberRef,
    ) -> Self {
        Self {
            id,
            guild,
            channel,
            invoker,
        }
    }
}

/// Everything an action receives about the invocation it serves.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    invocation: InvocationId,
    bot: BotContext,
    interaction: Interaction,
    response: ResponseHandle,
    surface: Arc<CommandSurface>,
}

impl InvocationContext {
    /// Creates an invocation context.
    #[must_use]
    pub fn new(
        bot: BotContext,
        interaction: Interaction,
        response: ResponseHandle,
        surface: Arc<CommandSurface>,
    ) -> Self {
        Self {
            invocation: InvocationId::new(),
            bot,
            interaction,
            response,
            surface,
        }
    }

    /// Returns the correlation identifier of this invocation.
    #[must_use]
    pub const fn invocation(&self) -> InvocationId {
        self.invocation
    }

    /// Returns the shared bot context.
    #[must_use]
    pub const fn bot(&self) -> &BotContext {
        &self.bot
    }

    /// Returns the host handle.
    #[must_use]
    pub fn host(&self) -> &Arc<dyn ChatHost> {
        self.bot.host()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BotConfig {
        self.bot.config()
    }

    /// Returns the inbound interaction.
    #[must_use]
    pub const fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Returns the member who triggered the interaction.
    #[must_use]
    pub const fn invoker(&self) -> &MemberRef {
        &self.interaction.invoker
    }

    /// Returns the response handle.
    #[must_use]
    pub const fn response(&self) -> &ResponseHandle {
        &self.response
    }

    /// Returns the composed command surface.
    #[must_use]
    pub fn surface(&self) -> &CommandSurface {
        &self.surface
    }

    /// Fails unless the invoker holds `role`.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::MissingRole`] when the role is absent.
    pub fn require_role(&self, role: RoleId) -> InvocationResult<()> {
        if self.invoker().has_role(role) {
            Ok(())
        } else {
            Err(InvocationError::MissingRole { role })
        }
    }

    /// Answers the interaction with a private text message.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ResponseHandle::reply`].
    pub async fn reply_private(&self, content: impl Into<String>) -> InvocationResult<()> {
        self.response.reply(Reply::text(content).ephemeral()).await
    }
}
