//! In-memory chat host for tests and offline tooling.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::capability::{
    domain::{
        ChannelId, CommandSurface, GuildId, InteractionId, MessageId, PanelSpec, RoleId,
        SurfaceManifest, UserId,
    },
    ports::{ChatHost, ChatHostError, ChatHostResult, InteractionResponder},
};
use crate::interaction::{MessageContent, MessageRef, Reply};

/// Identifier the in-memory host reports for the bot's own account.
pub const DEFAULT_BOT_USER: UserId = UserId::new(1);

/// Host operation, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOperation {
    /// [`ChatHost::attach_panel`].
    AttachPanel,
    /// [`ChatHost::connect`].
    Connect,
    /// [`ChatHost::sync_commands`].
    SyncCommands,
    /// [`ChatHost::send_message`].
    SendMessage,
    /// [`ChatHost::edit_message`].
    EditMessage,
    /// [`ChatHost::fetch_message`].
    FetchMessage,
    /// [`ChatHost::add_role`].
    AddRole,
    /// [`InteractionResponder::respond`].
    Respond,
    /// [`InteractionResponder::defer`].
    Defer,
    /// [`InteractionResponder::follow_up`].
    FollowUp,
}

/// Call accepted by the in-memory host, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// A panel was re-attached.
    AttachPanel {
        /// Panel channel.
        channel: ChannelId,
        /// Panel message.
        message: MessageId,
        /// Custom identifiers of the resumed components.
        custom_ids: Vec<String>,
    },
    /// The connection was opened.
    Connect,
    /// The command surface was installed.
    SyncCommands {
        /// Target server.
        guild: GuildId,
        /// Installed surface.
        manifest: SurfaceManifest,
    },
    /// A message was sent.
    SendMessage {
        /// Target channel.
        channel: ChannelId,
        /// Message content.
        content: MessageContent,
    },
    /// A message was edited.
    EditMessage {
        /// Message channel.
        channel: ChannelId,
        /// Edited message.
        message: MessageId,
        /// New content.
        content: MessageContent,
    },
    /// A role was granted.
    AddRole {
        /// Server.
        guild: GuildId,
        /// Member.
        user: UserId,
        /// Granted role.
        role: RoleId,
    },
    /// An interaction was answered directly.
    Respond {
        /// Answered interaction.
        interaction: InteractionId,
        /// Response.
        reply: Reply,
    },
    /// An interaction was acknowledged.
    Defer {
        /// Acknowledged interaction.
        interaction: InteractionId,
        /// Whether the eventual response is private.
        ephemeral: bool,
    },
    /// A follow-up was sent.
    FollowUp {
        /// Interaction followed up.
        interaction: InteractionId,
        /// Follow-up content.
        reply: Reply,
    },
}

/// Thread-safe recording chat host.
#[derive(Debug, Clone)]
pub struct InMemoryChatHost {
    state: Arc<RwLock<InMemoryHostState>>,
    bot_user: UserId,
    latency: Duration,
}

#[derive(Debug, Default)]
struct InMemoryHostState {
    calls: Vec<HostCall>,
    messages: HashMap<(ChannelId, MessageId), MessageRef>,
    next_message: u64,
    failing: HashSet<HostOperation>,
}

impl Default for InMemoryChatHost {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryChatHost {
    /// Creates an empty host with no latency.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryHostState {
                next_message: 1_000,
                ..InMemoryHostState::default()
            })),
            bot_user: DEFAULT_BOT_USER,
            latency: Duration::ZERO,
        }
    }

    /// Sets the reported gateway latency.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes every later call of `operation` fail with
    /// [`ChatHostError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Unavailable`] when the state lock is poisoned.
    pub fn fail_on(&self, operation: HostOperation) -> ChatHostResult<()> {
        let mut state = self.write_state()?;
        state.failing.insert(operation);
        Ok(())
    }

    /// Stores an existing message, as if it had been sent before start-up.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Unavailable`] when the state lock is poisoned.
    pub fn insert_message(&self, message: MessageRef) -> ChatHostResult<()> {
        let mut state = self.write_state()?;
        state.messages.insert((message.channel, message.id), message);
        Ok(())
    }

    /// Returns the accepted calls in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatHostError::Unavailable`] when the state lock is poisoned.
    pub fn calls(&self) -> ChatHostResult<Vec<HostCall>> {
        let state = self.state.read().map_err(|err| {
            ChatHostError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.calls.clone())
    }

    fn write_state(&self) -> ChatHostResult<std::sync::RwLockWriteGuard<'_, InMemoryHostState>> {
        self.state
            .write()
            .map_err(|err| ChatHostError::unavailable(std::io::Error::other(err.to_string())))
    }

    fn record(&self, operation: HostOperation, call: HostCall) -> ChatHostResult<()> {
        let mut state = self.write_state()?;
        if state.failing.contains(&operation) {
            return Err(ChatHostError::Rejected(format!(
                "{operation:?} is configured to fail"
            )));
        }
        state.calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl ChatHost for InMemoryChatHost {
    async fn attach_panel(&self, panel: &PanelSpec) -> ChatHostResult<()> {
        let target = panel.target();
        self.record(
            HostOperation::AttachPanel,
            HostCall::AttachPanel {
                channel: target.channel,
                message: target.message,
                custom_ids: panel.custom_ids().map(ToString::to_string).collect(),
            },
        )
    }

    async fn connect(&self) -> ChatHostResult<()> {
        self.record(HostOperation::Connect, HostCall::Connect)
    }

    async fn sync_commands(&self, guild: GuildId, surface: &CommandSurface) -> ChatHostResult<()> {
        self.record(
            HostOperation::SyncCommands,
            HostCall::SyncCommands {
                guild,
                manifest: surface.manifest(),
            },
        )
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &MessageContent,
    ) -> ChatHostResult<MessageId> {
        self.record(
            HostOperation::SendMessage,
            HostCall::SendMessage {
                channel,
                content: content.clone(),
            },
        )?;

        let mut state = self.write_state()?;
        state.next_message += 1;
        let id = MessageId::new(state.next_message);
        let mut message = MessageRef::new(
            channel,
            id,
            self.bot_user,
            content.content.clone().unwrap_or_default(),
        );
        message.embeds.clone_from(&content.embeds);
        state.messages.insert((channel, id), message);
        Ok(id)
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: &MessageContent,
    ) -> ChatHostResult<()> {
        {
            let state = self.write_state()?;
            if !state.messages.contains_key(&(channel, message)) {
                return Err(ChatHostError::NotFound(format!("message {message}")));
            }
        }
        self.record(
            HostOperation::EditMessage,
            HostCall::EditMessage {
                channel,
                message,
                content: content.clone(),
            },
        )?;

        let mut state = self.write_state()?;
        if let Some(stored) = state.messages.get_mut(&(channel, message)) {
            stored.content = content.content.clone().unwrap_or_default();
            stored.embeds.clone_from(&content.embeds);
        }
        Ok(())
    }

    async fn fetch_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> ChatHostResult<MessageRef> {
        let state = self.write_state()?;
        if state.failing.contains(&HostOperation::FetchMessage) {
            return Err(ChatHostError::Rejected(
                "FetchMessage is configured to fail".to_owned(),
            ));
        }
        state
            .messages
            .get(&(channel, message))
            .cloned()
            .ok_or_else(|| ChatHostError::NotFound(format!("message {message}")))
    }

    async fn add_role(&self, guild: GuildId, user: UserId, role: RoleId) -> ChatHostResult<()> {
        self.record(HostOperation::AddRole, HostCall::AddRole { guild, user, role })
    }

    fn current_user(&self) -> UserId {
        self.bot_user
    }

    fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl InteractionResponder for InMemoryChatHost {
    async fn respond(&self, interaction: InteractionId, reply: &Reply) -> ChatHostResult<()> {
        self.record(
            HostOperation::Respond,
            HostCall::Respond {
                interaction,
                reply: reply.clone(),
            },
        )
    }

    async fn defer(&self, interaction: InteractionId, ephemeral: bool) -> ChatHostResult<()> {
        self.record(
            HostOperation::Defer,
            HostCall::Defer {
                interaction,
                ephemeral,
            },
        )
    }

    async fn follow_up(&self, interaction: InteractionId, reply: &Reply) -> ChatHostResult<()> {
        self.record(
            HostOperation::FollowUp,
            HostCall::FollowUp {
                interaction,
                reply: reply.clone(),
            },
        )
    }
}
