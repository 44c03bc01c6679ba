//! Host call expectations for the start-up sequence, checked with a mock
//! host.

use std::sync::Arc;
use std::time::Duration;

use crate::in_memory::helpers::{GUILD, config, directory, roster};
use async_trait::async_trait;
use clubhouse::capability::{
    domain::{
        ChannelId, CommandSurface, GuildId, InteractionId, LifecycleState, MessageId, PanelSpec,
        RoleId, UserId,
    },
    ports::{ChatHost, ChatHostError, ChatHostResult, InteractionResponder},
    services::{LifecycleError, LifecycleOrchestrator},
};
use clubhouse::config::BotConfig;
use clubhouse::features;
use clubhouse::interaction::{MessageContent, MessageRef, Reply};
use clubhouse::membership::adapters::memory::InMemoryMembershipDirectory;
use mockall::{Sequence, mock};
use rstest::rstest;

mock! {
    pub Host {}

    #[async_trait]
    impl ChatHost for Host {
        async fn attach_panel(&self, panel: &PanelSpec) -> ChatHostResult<()>;
        async fn connect(&self) -> ChatHostResult<()>;
        async fn sync_commands(&self, guild: GuildId, surface: &CommandSurface) -> ChatHostResult<()>;
        async fn send_message(
            &self,
            channel: ChannelId,
            content: &MessageContent,
        ) -> ChatHostResult<MessageId>;
        async fn edit_message(
            &self,
            channel: ChannelId,
            message: MessageId,
            content: &MessageContent,
        ) -> ChatHostResult<()>;
        async fn fetch_message(
            &self,
            channel: ChannelId,
            message: MessageId,
        ) -> ChatHostResult<MessageRef>;
        async fn add_role(&self, guild: GuildId, user: UserId, role: RoleId) -> ChatHostResult<()>;
        fn current_user(&self) -> UserId;
        fn latency(&self) -> Duration;
    }

    #[async_trait]
    impl InteractionResponder for Host {
        async fn respond(&self, interaction: InteractionId, reply: &Reply) -> ChatHostResult<()>;
        async fn defer(&self, interaction: InteractionId, ephemeral: bool) -> ChatHostResult<()>;
        async fn follow_up(&self, interaction: InteractionId, reply: &Reply) -> ChatHostResult<()>;
    }
}

fn built_in(
    host: MockHost,
    config: &Arc<BotConfig>,
    directory: &InMemoryMembershipDirectory,
) -> LifecycleOrchestrator<MockHost> {
    LifecycleOrchestrator::new(
        Arc::new(host),
        Arc::clone(config),
        features::registry(&roster(directory)),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn host_sees_attach_connect_and_a_single_sync_in_order(
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let mut host = MockHost::new();
    let mut order = Sequence::new();
    host.expect_attach_panel()
        .withf(|panel| panel.target().message == MessageId::new(31))
        .times(1)
        .in_sequence(&mut order)
        .returning(|_| Ok(()));
    host.expect_attach_panel()
        .withf(|panel| panel.target().message == MessageId::new(33))
        .times(1)
        .in_sequence(&mut order)
        .returning(|_| Ok(()));
    host.expect_connect()
        .times(1)
        .in_sequence(&mut order)
        .returning(|| Ok(()));
    host.expect_sync_commands()
        .withf(|guild, surface| *guild == GUILD && surface.len() == 5)
        .times(1)
        .in_sequence(&mut order)
        .returning(|_, _| Ok(()));
    host.expect_latency().returning(|| Duration::from_millis(5));
    let bot = built_in(host, &bot_config, &directory);

    bot.load().await.expect("load should succeed");
    bot.start().await.expect("start should succeed");
    bot.handle_ready().await.expect("ready should succeed");
    bot.handle_ready().await.expect("repeat ready is ignored");

    assert_eq!(bot.state().await, LifecycleState::JobsRunning);
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_sync_keeps_the_orchestrator_connected(
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let mut host = MockHost::new();
    host.expect_attach_panel().times(2).returning(|_| Ok(()));
    host.expect_connect().times(1).returning(|| Ok(()));
    host.expect_sync_commands()
        .times(1)
        .returning(|_, _| Err(ChatHostError::Rejected("missing scope".to_owned())));
    let bot = built_in(host, &bot_config, &directory);

    bot.load().await.expect("load should succeed");
    bot.start().await.expect("start should succeed");
    let error = bot.handle_ready().await.expect_err("sync should fail");

    assert!(matches!(
        error,
        LifecycleError::Host {
            stage: LifecycleState::Synced,
            source: ChatHostError::Rejected(_),
        }
    ));
    assert_eq!(bot.state().await, LifecycleState::Connected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_connection_stops_after_panels_are_attached(
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let mut host = MockHost::new();
    host.expect_attach_panel().times(2).returning(|_| Ok(()));
    host.expect_connect()
        .times(1)
        .returning(|| Err(ChatHostError::NotFound("gateway".to_owned())));
    host.expect_sync_commands().never();
    let bot = built_in(host, &bot_config, &directory);

    bot.load().await.expect("load should succeed");
    let error = bot.start().await.expect_err("connect should fail");

    assert!(matches!(
        error,
        LifecycleError::Host {
            stage: LifecycleState::Connected,
            ..
        }
    ));
    assert_eq!(bot.state().await, LifecycleState::PanelsAttached);

    let stray = bot
        .handle_ready()
        .await
        .expect_err("ready after a failed connection is rejected");
    assert!(matches!(
        stray,
        LifecycleError::InvalidTransition {
            from: LifecycleState::PanelsAttached,
            to: LifecycleState::Synced,
        }
    ));
}
