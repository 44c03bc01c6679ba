//! Start-up against a host that reports readiness before `connect` returns.

use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use crate::in_memory::helpers::{config, directory, roster};
use async_trait::async_trait;
use clubhouse::capability::{
    adapters::memory::{HostCall, InMemoryChatHost},
    domain::{
        ChannelId, CommandSurface, GuildId, InteractionId, LifecycleState, MessageId, PanelSpec,
        RoleId, UserId,
    },
    ports::{ChatHost, ChatHostError, ChatHostResult, InteractionResponder},
    services::LifecycleOrchestrator,
};
use clubhouse::config::BotConfig;
use clubhouse::features;
use clubhouse::interaction::{MessageContent, MessageRef, Reply};
use clubhouse::membership::adapters::memory::InMemoryMembershipDirectory;
use rstest::rstest;
use tokio::sync::Notify;

type Bot = LifecycleOrchestrator<GatewayHost>;

/// Host whose `connect` delivers the ready signal itself, then optionally
/// keeps the connection open until released.
struct GatewayHost {
    inner: InMemoryChatHost,
    bot: OnceLock<Weak<Bot>>,
    hold_open: Option<Arc<Notify>>,
}

impl GatewayHost {
    fn new(hold_open: Option<Arc<Notify>>) -> Self {
        Self {
            inner: InMemoryChatHost::new(),
            bot: OnceLock::new(),
            hold_open,
        }
    }

    fn bind(&self, bot: &Arc<Bot>) {
        assert!(self.bot.set(Arc::downgrade(bot)).is_ok(), "bot bound once");
    }

    fn call_kinds(&self) -> Vec<&'static str> {
        self.inner
            .calls()
            .expect("calls should be readable")
            .iter()
            .filter_map(|call| match call {
                HostCall::AttachPanel { .. } => Some("attach"),
                HostCall::Connect => Some("connect"),
                HostCall::SyncCommands { .. } => Some("sync"),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatHost for GatewayHost {
    async fn attach_panel(&self, panel: &PanelSpec) -> ChatHostResult<()> {
        self.inner.attach_panel(panel).await
    }

    async fn connect(&self) -> ChatHostResult<()> {
        self.inner.connect().await?;
        let bot = self
            .bot
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| ChatHostError::Rejected("no bot bound to the gateway".to_owned()))?;
        bot.handle_ready()
            .await
            .map_err(|err| ChatHostError::Rejected(err.to_string()))?;
        if let Some(release) = &self.hold_open {
            release.notified().await;
        }
        Ok(())
    }

    async fn sync_commands(&self, guild: GuildId, surface: &CommandSurface) -> ChatHostResult<()> {
        self.inner.sync_commands(guild, surface).await
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &MessageContent,
    ) -> ChatHostResult<MessageId> {
        self.inner.send_message(channel, content).await
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: &MessageContent,
    ) -> ChatHostResult<()> {
        self.inner.edit_message(channel, message, content).await
    }

    async fn fetch_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> ChatHostResult<MessageRef> {
        self.inner.fetch_message(channel, message).await
    }

    async fn add_role(&self, guild: GuildId, user: UserId, role: RoleId) -> ChatHostResult<()> {
        self.inner.add_role(guild, user, role).await
    }

    fn current_user(&self) -> UserId {
        self.inner.current_user()
    }

    fn latency(&self) -> Duration {
        self.inner.latency()
    }
}

#[async_trait]
impl InteractionResponder for GatewayHost {
    async fn respond(&self, interaction: InteractionId, reply: &Reply) -> ChatHostResult<()> {
        self.inner.respond(interaction, reply).await
    }

    async fn defer(&self, interaction: InteractionId, ephemeral: bool) -> ChatHostResult<()> {
        self.inner.defer(interaction, ephemeral).await
    }

    async fn follow_up(&self, interaction: InteractionId, reply: &Reply) -> ChatHostResult<()> {
        self.inner.follow_up(interaction, reply).await
    }
}

fn gateway_bot(
    host: &Arc<GatewayHost>,
    config: Arc<BotConfig>,
    directory: &InMemoryMembershipDirectory,
) -> Arc<Bot> {
    let bot = Arc::new(LifecycleOrchestrator::new(
        Arc::clone(host),
        config,
        features::registry(&roster(directory)),
    ));
    host.bind(&bot);
    bot
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ready_delivered_inside_connect_completes_start_up(
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let host = Arc::new(GatewayHost::new(None));
    let bot = gateway_bot(&host, config.expect("config"), &directory);
    bot.load().await.expect("load should succeed");

    tokio::time::timeout(Duration::from_secs(2), bot.start())
        .await
        .expect("start should not block the ready signal")
        .expect("start should succeed");

    assert_eq!(bot.state().await, LifecycleState::JobsRunning);
    assert_eq!(host.call_kinds(), vec!["attach", "attach", "connect", "sync"]);
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ready_on_a_held_connection_syncs_while_connect_is_pending(
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let release = Arc::new(Notify::new());
    let host = Arc::new(GatewayHost::new(Some(Arc::clone(&release))));
    let bot = gateway_bot(&host, config.expect("config"), &directory);
    bot.load().await.expect("load should succeed");

    let starting = tokio::spawn({
        let running = Arc::clone(&bot);
        async move { running.start().await }
    });
    tokio::time::timeout(Duration::from_secs(2), async {
        while bot.state().await != LifecycleState::JobsRunning {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("ready should be handled while connect is pending");

    assert!(!starting.is_finished());
    assert_eq!(host.call_kinds(), vec!["attach", "attach", "connect", "sync"]);

    release.notify_one();
    starting
        .await
        .expect("start task should join")
        .expect("start should succeed");
    assert_eq!(bot.state().await, LifecycleState::JobsRunning);
    bot.shutdown().await;
}
