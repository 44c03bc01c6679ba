//! Shared fixtures for in-memory orchestration tests.

use std::sync::Arc;
use std::time::Duration;

use clubhouse::capability::{
    adapters::memory::{HostCall, InMemoryChatHost},
    domain::{CapabilityRegistry, ChannelId, GuildId, InteractionId, RoleId, UserId},
    services::{DispatchOutcome, InboundInteraction, LifecycleOrchestrator},
};
use clubhouse::config::BotConfig;
use clubhouse::features;
use clubhouse::interaction::{Interaction, MemberRef, Reply};
use clubhouse::membership::{
    CachedMembershipRoster, MembershipLookup, adapters::memory::InMemoryMembershipDirectory,
};
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest::fixture;

/// Server every test interaction happens in.
pub const GUILD: GuildId = GuildId::new(4242);
/// Role granted by the verification panel.
pub const MEMBER_ROLE: RoleId = RoleId::new(10);
/// Role allowed to use moderation commands.
pub const MODERATOR_ROLE: RoleId = RoleId::new(11);
/// Channel receiving greetings.
pub const WELCOME_CHANNEL: ChannelId = ChannelId::new(20);
/// Channel receiving tickets and reports.
pub const SUPPORT_CHANNEL: ChannelId = ChannelId::new(21);

/// Configuration document shared by the tests.
pub const CONFIG_JSON: &str = r#"{
    "server_id": 4242,
    "roles": { "member": 10, "moderator": 11 },
    "channels": { "welcome": 20, "support": 21 },
    "panels": {
        "verify": { "channel": 30, "message": 31 },
        "support": { "channel": 32, "message": 33 }
    },
    "jobs": { "roster_refresh_secs": 60 }
}"#;

/// Provides the parsed test configuration.
///
/// # Errors
///
/// Returns an error if the configuration document does not parse.
#[fixture]
pub fn config() -> eyre::Result<Arc<BotConfig>> {
    BotConfig::from_json_str(CONFIG_JSON)
        .map(Arc::new)
        .wrap_err("parse test configuration")
}

/// Provides a fresh recording host for each test.
#[fixture]
pub fn host() -> Arc<InMemoryChatHost> {
    Arc::new(InMemoryChatHost::new().with_latency(Duration::from_millis(42)))
}

/// Provides a roster directory listing `alice` and `bob`.
#[fixture]
pub fn directory() -> InMemoryMembershipDirectory {
    InMemoryMembershipDirectory::with_members(["alice", "bob"])
}

/// Wraps a directory in a caching roster.
#[must_use]
pub fn roster(directory: &InMemoryMembershipDirectory) -> Arc<dyn MembershipLookup> {
    Arc::new(CachedMembershipRoster::new(
        Arc::new(directory.clone()),
        Arc::new(DefaultClock),
        Duration::from_secs(600),
    ))
}

/// Builds an orchestrator over the built-in capabilities.
#[must_use]
pub fn orchestrator(
    host: &Arc<InMemoryChatHost>,
    config: &Arc<BotConfig>,
    directory: &InMemoryMembershipDirectory,
) -> LifecycleOrchestrator<InMemoryChatHost> {
    orchestrator_with(host, config, features::registry(&roster(directory)))
}

/// Builds an orchestrator over a custom registry.
#[must_use]
pub fn orchestrator_with(
    host: &Arc<InMemoryChatHost>,
    config: &Arc<BotConfig>,
    registry: CapabilityRegistry,
) -> LifecycleOrchestrator<InMemoryChatHost> {
    LifecycleOrchestrator::new(Arc::clone(host), Arc::clone(config), registry)
}

/// Drives an orchestrator through load, start, and the ready signal.
///
/// # Errors
///
/// Returns an error if any lifecycle step fails.
pub async fn run_to_ready(
    orchestrator: &LifecycleOrchestrator<InMemoryChatHost>,
) -> eyre::Result<()> {
    orchestrator.load().await.wrap_err("load capabilities")?;
    orchestrator.start().await.wrap_err("start host")?;
    orchestrator.handle_ready().await.wrap_err("handle ready")?;
    Ok(())
}

/// Creates a member without roles.
#[must_use]
pub fn member(user: u64, handle: &str) -> MemberRef {
    MemberRef::new(UserId::new(user), handle)
}

/// Creates a member holding the moderator role.
#[must_use]
pub fn moderator() -> MemberRef {
    member(500, "mod").with_role(MODERATOR_ROLE)
}

/// Creates interaction metadata for `invoker`.
#[must_use]
pub fn interaction(id: u64, invoker: MemberRef) -> Interaction {
    Interaction::new(InteractionId::new(id), GUILD, ChannelId::new(99), invoker)
}

/// Dispatches an interaction and fails unless the action completed.
///
/// # Errors
///
/// Returns an error if dispatch is unavailable or the action failed.
pub async fn dispatch_ok(
    orchestrator: &LifecycleOrchestrator<InMemoryChatHost>,
    inbound: InboundInteraction,
) -> eyre::Result<()> {
    let dispatcher = orchestrator.dispatcher().wrap_err("obtain dispatcher")?;
    match dispatcher.dispatch(inbound).await {
        DispatchOutcome::Completed => Ok(()),
        other => Err(eyre!("expected completed dispatch, got {other:?}")),
    }
}

/// Returns the replies and follow-ups sent for one interaction, in order.
///
/// # Errors
///
/// Returns an error if the host calls cannot be read.
pub fn replies_for(host: &InMemoryChatHost, id: u64) -> eyre::Result<Vec<Reply>> {
    let target = InteractionId::new(id);
    let calls = host.calls().wrap_err("read host calls")?;
    Ok(calls
        .into_iter()
        .filter_map(|call| match call {
            HostCall::Respond { interaction, reply } | HostCall::FollowUp { interaction, reply }
                if interaction == target =>
            {
                Some(reply)
            }
            _ => None,
        })
        .collect())
}

/// Returns the text of the single reply sent for one interaction.
///
/// # Errors
///
/// Returns an error if there is not exactly one reply with text content.
pub fn only_reply_text(host: &InMemoryChatHost, id: u64) -> eyre::Result<String> {
    let replies = replies_for(host, id)?;
    let [reply] = replies.as_slice() else {
        return Err(eyre!("expected one reply, got {}", replies.len()));
    };
    reply
        .body
        .content
        .clone()
        .ok_or_else(|| eyre!("reply carries no text"))
}

/// Returns the description of the single failure embed sent for one
/// interaction.
///
/// # Errors
///
/// Returns an error if there is not exactly one embed reply.
pub fn only_failure_text(host: &InMemoryChatHost, id: u64) -> eyre::Result<String> {
    let replies = replies_for(host, id)?;
    let [reply] = replies.as_slice() else {
        return Err(eyre!("expected one reply, got {}", replies.len()));
    };
    reply
        .body
        .embeds
        .first()
        .and_then(|embed| embed.description.clone())
        .ok_or_else(|| eyre!("reply carries no failure embed"))
}
