//! In-memory integration tests for persistent panel interactions.

use std::sync::Arc;

use crate::in_memory::helpers::{
    GUILD, MEMBER_ROLE, SUPPORT_CHANNEL, config, directory, dispatch_ok, host, interaction,
    member, only_reply_text, orchestrator, replies_for, run_to_ready,
};
use clubhouse::capability::{
    adapters::memory::{HostCall, HostOperation, InMemoryChatHost},
    domain::{InteractionId, UserId},
    services::{DispatchOutcome, InboundInteraction, LifecycleOrchestrator},
};
use clubhouse::config::BotConfig;
use clubhouse::interaction::Reply;
use clubhouse::membership::adapters::memory::InMemoryMembershipDirectory;
use rstest::rstest;

const VERIFY_BUTTON: &str = "verify-button-4242";
const SUPPORT_BUTTON: &str = "support-open-4242";

async fn ready(
    host: &Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: &InMemoryMembershipDirectory,
) -> LifecycleOrchestrator<InMemoryChatHost> {
    let bot_config = config.expect("config");
    let bot = orchestrator(host, &bot_config, directory);
    run_to_ready(&bot).await.expect("start-up should succeed");
    bot
}

fn calls_for(host: &InMemoryChatHost, id: u64) -> Vec<HostCall> {
    let target = InteractionId::new(id);
    host.calls()
        .expect("calls should be readable")
        .into_iter()
        .filter(|call| match call {
            HostCall::Defer { interaction, .. }
            | HostCall::Respond { interaction, .. }
            | HostCall::FollowUp { interaction, .. } => *interaction == target,
            _ => false,
        })
        .collect()
}

fn granted_roles(host: &InMemoryChatHost) -> Vec<HostCall> {
    host.calls()
        .expect("calls should be readable")
        .into_iter()
        .filter(|call| matches!(call, HostCall::AddRole { .. }))
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verify_acknowledges_then_grants_the_member_role(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot = ready(&host, config, &directory).await;

    dispatch_ok(
        &bot,
        InboundInteraction::component(interaction(1, member(7, "@Alice")), VERIFY_BUTTON),
    )
    .await
    .expect("verification should complete");

    assert_eq!(
        calls_for(&host, 1),
        vec![
            HostCall::Defer {
                interaction: InteractionId::new(1),
                ephemeral: true,
            },
            HostCall::FollowUp {
                interaction: InteractionId::new(1),
                reply: Reply::text("You are verified. Welcome to the club!").ephemeral(),
            },
        ]
    );
    assert_eq!(
        granted_roles(&host),
        vec![HostCall::AddRole {
            guild: GUILD,
            user: UserId::new(7),
            role: MEMBER_ROLE,
        }]
    );
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verify_turns_away_members_missing_from_the_roster(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot = ready(&host, config, &directory).await;

    dispatch_ok(
        &bot,
        InboundInteraction::component(interaction(2, member(8, "carol")), VERIFY_BUTTON),
    )
    .await
    .expect("verification should complete");

    assert_eq!(
        only_reply_text(&host, 2).expect("follow-up"),
        "Your account is not on the club roster. Register with the club first, then press Verify again."
    );
    assert!(granted_roles(&host).is_empty());
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verify_reports_unknown_membership_when_the_roster_is_down(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    directory.set_unavailable(true);
    let bot = ready(&host, config, &directory).await;

    dispatch_ok(
        &bot,
        InboundInteraction::component(interaction(3, member(7, "alice")), VERIFY_BUTTON),
    )
    .await
    .expect("verification should complete");

    assert_eq!(
        only_reply_text(&host, 3).expect("follow-up"),
        "Your membership could not be checked right now. Please try again later."
    );
    assert!(granted_roles(&host).is_empty());
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verified_members_get_a_direct_private_reply(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot = ready(&host, config, &directory).await;

    dispatch_ok(
        &bot,
        InboundInteraction::component(
            interaction(4, member(7, "alice").with_role(MEMBER_ROLE)),
            VERIFY_BUTTON,
        ),
    )
    .await
    .expect("verification should complete");

    assert_eq!(
        calls_for(&host, 4),
        vec![HostCall::Respond {
            interaction: InteractionId::new(4),
            reply: Reply::text("You are already verified.").ephemeral(),
        }]
    );
    assert_eq!(directory.fetch_count(), 0);
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_role_grant_is_reported_through_the_follow_up(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    host.fail_on(HostOperation::AddRole)
        .expect("failure should be configured");
    let bot = ready(&host, config, &directory).await;

    let outcome = bot
        .dispatcher()
        .expect("dispatcher")
        .dispatch(InboundInteraction::component(
            interaction(5, member(7, "alice")),
            VERIFY_BUTTON,
        ))
        .await;

    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    let replies = replies_for(&host, 5).expect("replies");
    let failure = replies.first().expect("failure follow-up");
    assert!(failure.ephemeral);
    assert_eq!(
        failure
            .body
            .embeds
            .first()
            .and_then(|embed| embed.description.as_deref()),
        Some("Something went wrong while handling this. Please try again later.")
    );
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn support_panel_opens_a_ticket(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot = ready(&host, config, &directory).await;

    dispatch_ok(
        &bot,
        InboundInteraction::component(
            interaction(6, member(7, "alice").with_display_name("Alice")),
            SUPPORT_BUTTON,
        ),
    )
    .await
    .expect("ticket should open");

    let ticket = host
        .calls()
        .expect("calls should be readable")
        .into_iter()
        .find_map(|call| match call {
            HostCall::SendMessage { channel, content } if channel == SUPPORT_CHANNEL => {
                content.embeds.into_iter().next()
            }
            _ => None,
        })
        .expect("ticket sent");
    assert_eq!(ticket.title.as_deref(), Some("Support request"));
    assert_eq!(
        ticket.description.as_deref(),
        Some("Alice asked for help from the support panel.")
    );
    assert_eq!(
        only_reply_text(&host, 6).expect("follow-up"),
        "Successfully opened a support ticket. Expect a response from a board member soon."
    );
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_custom_ids_are_unrouted(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot = ready(&host, config, &directory).await;

    let outcome = bot
        .dispatcher()
        .expect("dispatcher")
        .dispatch(InboundInteraction::component(
            interaction(7, member(7, "alice")),
            "verify-button-1",
        ))
        .await;

    assert!(matches!(outcome, DispatchOutcome::Unrouted));
    bot.shutdown().await;
}
