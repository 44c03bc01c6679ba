//! Shared world state for capability composition BDD scenarios.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use clubhouse::capability::{
    adapters::memory::InMemoryChatHost,
    domain::{CapabilityEntry, CapabilityRegistry},
    services::{DispatchOutcome, LifecycleOrchestrator, LifecycleResult},
};
use clubhouse::config::BotConfig;
use rstest::fixture;

/// Configuration shared by every scenario; its custom-id seed is `4242`.
const CONFIG_JSON: &str = r#"{
    "server_id": 4242,
    "roles": { "member": 10, "moderator": 11 },
    "channels": { "welcome": 20, "support": 21 },
    "panels": {
        "verify": { "channel": 30, "message": 31 },
        "support": { "channel": 32, "message": 33 }
    }
}"#;

/// Scenario world for capability composition behaviour tests.
pub struct CompositionWorld {
    /// Recording host.
    pub host: Arc<InMemoryChatHost>,
    /// Registrations queued by `Given` steps.
    pub entries: Vec<CapabilityEntry>,
    /// Orchestrator created when the capabilities are loaded.
    pub orchestrator: Option<LifecycleOrchestrator<InMemoryChatHost>>,
    /// Result of the last `load` call.
    pub load_result: Option<LifecycleResult<()>>,
    /// Number of panel action runs.
    pub presses: Arc<AtomicUsize>,
    /// Outcome of the last simulated interaction.
    pub last_outcome: Option<DispatchOutcome>,
}

impl CompositionWorld {
    /// Creates a world with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: Arc::new(InMemoryChatHost::new()),
            entries: Vec::new(),
            orchestrator: None,
            load_result: None,
            presses: Arc::new(AtomicUsize::new(0)),
            last_outcome: None,
        }
    }

    /// Returns the orchestrator built by the load step.
    ///
    /// # Errors
    ///
    /// Returns an error when the capabilities have not been loaded yet.
    pub fn orchestrator(&self) -> Result<&LifecycleOrchestrator<InMemoryChatHost>, eyre::Report> {
        self.orchestrator
            .as_ref()
            .ok_or_else(|| eyre::eyre!("capabilities have not been loaded in this scenario"))
    }

    /// Builds the registry from the queued registrations.
    #[must_use]
    pub fn registry(&self) -> CapabilityRegistry {
        self.entries
            .iter()
            .cloned()
            .fold(CapabilityRegistry::new(), CapabilityRegistry::with)
    }
}

impl Default for CompositionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> CompositionWorld {
    CompositionWorld::default()
}

/// Parses the shared scenario configuration.
///
/// # Errors
///
/// Returns an error if the configuration document does not parse.
pub fn config() -> Result<Arc<BotConfig>, eyre::Report> {
    BotConfig::from_json_str(CONFIG_JSON)
        .map(Arc::new)
        .map_err(|err| eyre::eyre!("scenario configuration is invalid: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
