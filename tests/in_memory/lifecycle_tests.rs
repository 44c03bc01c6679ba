//! In-memory integration tests for the start-up sequence.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::in_memory::helpers::{
    config, directory, host, interaction, member, orchestrator, orchestrator_with, run_to_ready,
};
use clubhouse::capability::{
    adapters::memory::{HostCall, HostOperation, InMemoryChatHost},
    domain::{
        CapabilityDraft, CapabilityEntry, CapabilityKind, CapabilityRegistry, ChannelId,
        CommandDraft, ConfigurationError, JobDraft, LifecycleState, MessageId,
    },
    ports::{command_fn, job_fn},
    services::{DispatchOutcome, InboundInteraction, LifecycleError},
};
use clubhouse::config::BotConfig;
use clubhouse::membership::adapters::memory::InMemoryMembershipDirectory;
use rstest::rstest;
use tokio::time::Instant;

type RunLog = Arc<Mutex<Vec<u64>>>;

fn command(identifier: &'static str, documentation: &'static str) -> CapabilityEntry {
    CapabilityEntry::with_builder(identifier, documentation, CapabilityKind::Command, |_| {
        CapabilityDraft::Command(
            CommandDraft::new().action(command_fn(|_, _| async { Ok(()) })),
        )
    })
}

fn recording_job(
    identifier: &'static str,
    every_secs: u64,
    busy_for: Duration,
    log: &RunLog,
    origin: Instant,
) -> CapabilityEntry {
    let runs = Arc::clone(log);
    CapabilityEntry::with_builder(
        identifier,
        "Records when it runs.",
        CapabilityKind::BackgroundJob,
        move |_| {
            let job_runs = Arc::clone(&runs);
            CapabilityDraft::BackgroundJob(JobDraft::new().every_secs(every_secs).action(job_fn(
                move || {
                    let entries = Arc::clone(&job_runs);
                    async move {
                        if let Ok(mut recorded) = entries.lock() {
                            recorded.push(origin.elapsed().as_secs());
                        }
                        tokio::time::sleep(busy_for).await;
                        Ok(())
                    }
                },
            )))
        },
    )
}

fn recorded(log: &RunLog) -> Vec<u64> {
    log.lock().expect("run log lock").clone()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn panels_are_attached_before_connecting_and_commands_sync_after_ready(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let bot = orchestrator(&host, &bot_config, &directory);

    run_to_ready(&bot).await.expect("start-up should succeed");

    assert_eq!(bot.state().await, LifecycleState::JobsRunning);
    let calls = host.calls().expect("calls should be readable");
    let kinds: Vec<&str> = calls
        .iter()
        .map(|call| match call {
            HostCall::AttachPanel { .. } => "attach",
            HostCall::Connect => "connect",
            HostCall::SyncCommands { .. } => "sync",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["attach", "attach", "connect", "sync"]);

    let attached: Vec<(ChannelId, MessageId)> = calls
        .iter()
        .filter_map(|call| match call {
            HostCall::AttachPanel {
                channel, message, ..
            } => Some((*channel, *message)),
            _ => None,
        })
        .collect();
    assert_eq!(
        attached,
        vec![
            (ChannelId::new(30), MessageId::new(31)),
            (ChannelId::new(32), MessageId::new(33)),
        ]
    );
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn synchronised_surface_lists_built_in_commands(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let bot = orchestrator(&host, &bot_config, &directory);
    run_to_ready(&bot).await.expect("start-up should succeed");

    let calls = host.calls().expect("calls should be readable");
    let manifest = calls
        .iter()
        .find_map(|call| match call {
            HostCall::SyncCommands { manifest, .. } => Some(manifest.clone()),
            _ => None,
        })
        .expect("surface should be synchronised");

    let mut names: Vec<&str> = manifest
        .commands
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["edit", "help", "ping", "send", "timer"]);

    let timer = manifest
        .commands
        .iter()
        .find(|entry| entry.name == "timer")
        .expect("timer group present");
    let subcommands: Vec<&str> = timer
        .subcommands
        .iter()
        .map(|sub| sub.name.as_str())
        .collect();
    assert_eq!(subcommands, vec!["start", "end"]);

    let mut actions: Vec<&str> = manifest
        .context_actions
        .iter()
        .map(|action| action.name.as_str())
        .collect();
    actions.sort_unstable();
    assert_eq!(actions, vec!["report", "whois"]);
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_ready_signal_synchronises_once(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let bot = orchestrator(&host, &bot_config, &directory);
    run_to_ready(&bot).await.expect("start-up should succeed");

    bot.handle_ready().await.expect("repeat ready is ignored");

    let syncs = host
        .calls()
        .expect("calls should be readable")
        .iter()
        .filter(|call| matches!(call, HostCall::SyncCommands { .. }))
        .count();
    assert_eq!(syncs, 1);
    bot.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ready_before_connect_is_an_invalid_transition(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let bot = orchestrator(&host, &bot_config, &directory);
    bot.load().await.expect("load should succeed");

    let error = bot.handle_ready().await.expect_err("ready must wait for connect");

    assert!(matches!(
        error,
        LifecycleError::InvalidTransition {
            from: LifecycleState::AwaitingConnect,
            to: LifecycleState::Synced,
        }
    ));
    assert!(host.calls().expect("calls should be readable").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn command_without_action_halts_start_up(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
) {
    let bot_config = config.expect("config");
    let registry = CapabilityRegistry::new()
        .with(command("ping", "Check the latency."))
        .with(CapabilityEntry::with_builder(
            "broken",
            "Never wired up.",
            CapabilityKind::Command,
            |_| CapabilityDraft::Command(CommandDraft::new()),
        ));
    let bot = orchestrator_with(&host, &bot_config, registry);

    let error = bot.load().await.expect_err("validation should fail");

    assert!(matches!(
        &error,
        LifecycleError::Configuration(ConfigurationError::MissingBehaviour {
            implementation,
            behaviour,
        }) if implementation == "broken" && behaviour == "action"
    ));
    assert!(bot.state().await < LifecycleState::Composed);
    assert!(matches!(
        bot.dispatcher(),
        Err(LifecycleError::DispatchUnavailable)
    ));
    assert!(bot.start().await.is_err());
    assert!(host.calls().expect("calls should be readable").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_top_level_names_are_rejected(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
) {
    let bot_config = config.expect("config");
    let clashing = CapabilityEntry::with_builder(
        "latency",
        "Also checks the latency.",
        CapabilityKind::Command,
        |_| {
            CapabilityDraft::Command(
                CommandDraft::new()
                    .named("ping")
                    .action(command_fn(|_, _| async { Ok(()) })),
            )
        },
    );
    let registry = CapabilityRegistry::new()
        .with(command("ping", "Check the latency."))
        .with(clashing);
    let bot = orchestrator_with(&host, &bot_config, registry);

    let error = bot.load().await.expect_err("composition should fail");

    assert!(matches!(
        &error,
        LifecycleError::Configuration(ConfigurationError::DuplicateName {
            implementation,
            name,
            existing,
        }) if implementation == "latency" && name == "ping" && existing == "ping"
    ));
    assert_eq!(bot.state().await, LifecycleState::Validated);
    assert!(matches!(
        bot.dispatcher(),
        Err(LifecycleError::DispatchUnavailable)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_is_unavailable_before_loading(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let bot = orchestrator(&host, &bot_config, &directory);

    let error = bot.dispatcher().expect_err("nothing is composed yet");

    assert!(matches!(error, LifecycleError::DispatchUnavailable));
    assert_eq!(
        error.to_string(),
        "interactions cannot be dispatched before the command surface is composed"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_panel_attachment_prevents_connecting(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    host.fail_on(HostOperation::AttachPanel)
        .expect("failure should be configured");
    let bot = orchestrator(&host, &bot_config, &directory);
    bot.load().await.expect("load should succeed");

    let error = bot.start().await.expect_err("attachment should fail");

    assert!(matches!(
        error,
        LifecycleError::Host {
            stage: LifecycleState::PanelsAttached,
            ..
        }
    ));
    assert_eq!(bot.state().await, LifecycleState::AwaitingConnect);
    assert!(
        !host
            .calls()
            .expect("calls should be readable")
            .contains(&HostCall::Connect)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn panel_components_are_unrouted_until_panels_are_attached(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
    directory: InMemoryMembershipDirectory,
) {
    let bot_config = config.expect("config");
    let bot = orchestrator(&host, &bot_config, &directory);
    bot.load().await.expect("load should succeed");
    let dispatcher = bot.dispatcher().expect("dispatcher after load");

    let outcome = dispatcher
        .dispatch(InboundInteraction::component(
            interaction(1, member(7, "alice")),
            "verify-button-4242",
        ))
        .await;

    assert!(matches!(outcome, DispatchOutcome::Unrouted));
    assert!(!dispatcher.panels_installed());

    bot.start().await.expect("start should succeed");
    assert!(dispatcher.panels_installed());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn jobs_fire_on_independent_schedules_after_ready(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
) {
    let bot_config = config.expect("config");
    let fast_runs: RunLog = Arc::default();
    let slow_runs: RunLog = Arc::default();
    let origin = Instant::now();
    let registry = CapabilityRegistry::new()
        .with(recording_job(
            "fast_job",
            5,
            Duration::from_secs(3),
            &fast_runs,
            origin,
        ))
        .with(recording_job(
            "slow_job",
            10,
            Duration::ZERO,
            &slow_runs,
            origin,
        ));
    let bot = orchestrator_with(&host, &bot_config, registry);

    run_to_ready(&bot).await.expect("start-up should succeed");
    tokio::time::sleep(Duration::from_secs(21)).await;
    bot.shutdown().await;

    assert_eq!(recorded(&fast_runs), vec![5, 10, 15, 20]);
    assert_eq!(recorded(&slow_runs), vec![10, 20]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn jobs_never_run_before_the_ready_signal(
    host: Arc<InMemoryChatHost>,
    config: eyre::Result<Arc<BotConfig>>,
) {
    let bot_config = config.expect("config");
    let runs: RunLog = Arc::default();
    let registry = CapabilityRegistry::new().with(recording_job(
        "heartbeat",
        10,
        Duration::ZERO,
        &runs,
        Instant::now(),
    ));
    let bot = orchestrator_with(&host, &bot_config, registry);

    bot.load().await.expect("load should succeed");
    bot.start().await.expect("start should succeed");
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(recorded(&runs).is_empty());

    bot.handle_ready().await.expect("ready should succeed");
    tokio::time::sleep(Duration::from_secs(31)).await;
    bot.shutdown().await;

    assert_eq!(recorded(&runs), vec![40, 50, 60]);
}
