//! Validates the built-in capabilities and prints the command surface.
//!
//! Usage:
//!
//! ```text
//! capability-audit [config-path]
//! ```
//!
//! Without an argument the configuration path comes from `CLUBHOUSE_CONFIG`,
//! falling back to `config.json`. The capabilities are loaded against an
//! in-memory host, so no connection is made. On success the command-surface
//! manifest is written to stdout as JSON; any contract violation exits with a
//! non-zero status after naming the offending implementation.

use clubhouse::capability::adapters::memory::InMemoryChatHost;
use clubhouse::capability::services::{LifecycleError, LifecycleOrchestrator};
use clubhouse::config::{BotConfig, ConfigError};
use clubhouse::features;
use clubhouse::membership::adapters::memory::InMemoryMembershipDirectory;
use clubhouse::membership::{CachedMembershipRoster, MembershipLookup};
use clubhouse::telemetry::init_tracing;
use mockable::DefaultClock;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while auditing capabilities.
#[derive(Debug, Error)]
enum AuditError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("capabilities failed to load: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("failed to serialise the manifest: {0}")]
    Manifest(#[source] serde_json::Error),
    #[error("failed to write the manifest: {0}")]
    Output(#[source] io::Error),
}

fn main() -> Result<(), BoxError> {
    init_tracing();
    run(env::args_os().skip(1).map(PathBuf::from)).map_err(|err| {
        error!(error = %err, "capability audit failed");
        err.into()
    })
}

fn run(args: impl Iterator<Item = PathBuf>) -> Result<(), AuditError> {
    let config = load_config(config_path(args)?)?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AuditError::RuntimeInit)?;
    let manifest = runtime.block_on(audit(Arc::new(config)))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{manifest}").map_err(AuditError::Output)
}

fn config_path(mut args: impl Iterator<Item = PathBuf>) -> Result<Option<PathBuf>, AuditError> {
    let path = args.next();
    if args.next().is_some() {
        return Err(AuditError::InvalidArgs(
            "expected at most one configuration path".to_owned(),
        ));
    }
    Ok(path)
}

fn load_config(path: Option<PathBuf>) -> Result<BotConfig, ConfigError> {
    path.map_or_else(BotConfig::load_from_env, BotConfig::load)
}

async fn audit(config: Arc<BotConfig>) -> Result<String, AuditError> {
    let roster: Arc<dyn MembershipLookup> = Arc::new(CachedMembershipRoster::new(
        Arc::new(InMemoryMembershipDirectory::new()),
        Arc::new(DefaultClock),
        config.roster_ttl(),
    ));
    let orchestrator = LifecycleOrchestrator::new(
        Arc::new(InMemoryChatHost::new()),
        config,
        features::registry(&roster),
    );
    orchestrator.load().await?;

    let dispatcher = orchestrator.dispatcher()?;
    let surface = dispatcher.surface();
    info!(
        entries = surface.len(),
        context_actions = surface.context_actions().len(),
        "capabilities validated"
    );
    serde_json::to_string_pretty(&surface.manifest()).map_err(AuditError::Manifest)
}
