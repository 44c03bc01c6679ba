//! Start-up orchestration of registered capabilities.
//!
//! Provides [`LifecycleOrchestrator`], which drives the one-directional
//! sequence from an unloaded registry to running background jobs:
//!
//! ```text
//! load:         Unloaded -> Validated -> Composed -> AwaitingConnect
//! start:        AwaitingConnect -> PanelsAttached -> Connected
//! handle_ready: Connected -> Synced -> JobsRunning
//! ```
//!
//! The lifecycle lock is released while the host connects, so a host that
//! reports readiness before `connect` returns is handled in place.

use super::{
    BackgroundJobScheduler, CommandTreeComposer, ContractValidator, EventDispatchBinder,
    InteractionDispatcher, JobsHandle, PanelRoutes, PersistentPanelReattacher,
    ValidatedCapabilities,
};
use crate::capability::domain::{
    CapabilityRegistry, ConfigurationError, HostEvent, JobSpec, LifecycleState, PanelSpec,
};
use crate::capability::ports::{ChatHost, ChatHostError, InteractionResponder};
use crate::config::BotConfig;
use crate::interaction::BotContext;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Errors returned by the orchestrator.
#[derive(Debug, Clone, Error)]
pub enum LifecycleError {
    /// A capability failed validation or composition. Fatal.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The host failed during a start-up step.
    #[error("host failure while reaching {stage}: {source}")]
    Host {
        /// State the orchestrator was trying to reach.
        stage: LifecycleState,
        /// Host error.
        #[source]
        source: ChatHostError,
    },

    /// The requested step is not valid in the current state.
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current state.
        from: LifecycleState,
        /// Requested state.
        to: LifecycleState,
    },

    /// Dispatch was requested before composition completed.
    #[error("interactions cannot be dispatched before the command surface is composed")]
    DispatchUnavailable,
}

/// Result type for orchestrator operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

#[derive(Debug)]
struct LifecycleInner {
    state: LifecycleState,
    panels: Vec<PanelSpec>,
    panel_routes: Option<PanelRoutes>,
    jobs: Vec<Arc<JobSpec>>,
    running: Option<JobsHandle>,
    connecting: bool,
}

impl LifecycleInner {
    fn advance(&mut self, target: LifecycleState) -> LifecycleResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        info!(from = %self.state, to = %target, "lifecycle transition");
        self.state = target;
        Ok(())
    }

    fn expect_state(&self, expected: LifecycleState, target: LifecycleState) -> LifecycleResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: target,
            })
        }
    }
}

/// Sequences capability activation against the host.
pub struct LifecycleOrchestrator<H>
where
    H: ChatHost + InteractionResponder + 'static,
{
    host: Arc<H>,
    context: BotContext,
    registry: CapabilityRegistry,
    dispatcher: OnceLock<Arc<InteractionDispatcher>>,
    inner: Mutex<LifecycleInner>,
}

impl<H> LifecycleOrchestrator<H>
where
    H: ChatHost + InteractionResponder + 'static,
{
    /// Creates an orchestrator in the `Unloaded` state.
    #[must_use]
    pub fn new(host: Arc<H>, config: Arc<BotConfig>, registry: CapabilityRegistry) -> Self {
        let chat_host: Arc<dyn ChatHost> = Arc::clone(&host) as Arc<dyn ChatHost>;
        Self {
            host,
            context: BotContext::new(chat_host, config),
            registry,
            dispatcher: OnceLock::new(),
            inner: Mutex::new(LifecycleInner {
                state: LifecycleState::Unloaded,
                panels: Vec::new(),
                panel_routes: None,
                jobs: Vec::new(),
                running: None,
                connecting: false,
            }),
        }
    }

    /// Returns the current state.
    pub async fn state(&self) -> LifecycleState {
        self.inner.lock().await.state
    }

    /// Returns the shared construction context.
    #[must_use]
    pub const fn context(&self) -> &BotContext {
        &self.context
    }

    /// Validates, composes, and binds every registered capability.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Configuration`] when a capability breaks its
    /// contract or collides with another; the orchestrator stays in the state
    /// it failed to leave. Returns [`LifecycleError::InvalidTransition`] when
    /// called twice.
    pub async fn load(&self) -> LifecycleResult<()> {
        let mut inner = self.inner.lock().await;
        inner.expect_state(LifecycleState::Unloaded, LifecycleState::Validated)?;

        let validated = ContractValidator::new(self.context.clone())
            .validate(&self.registry)
            .inspect_err(|err| {
                error!(implementation = err.implementation(), error = %err, "capability validation failed");
            })?;
        info!(capabilities = validated.len(), "capabilities validated");
        inner.advance(LifecycleState::Validated)?;

        let ValidatedCapabilities {
            commands,
            groups,
            context_actions,
            events,
            panels,
            jobs,
        } = validated;
        let (surface, routes) = CommandTreeComposer::new()
            .compose(groups, commands, context_actions)
            .and_then(|surface| PanelRoutes::build(&panels).map(|routes| (surface, routes)))
            .inspect_err(|err| {
                error!(implementation = err.implementation(), error = %err, "capability composition failed");
            })?;
        let hooks = EventDispatchBinder::new().bind(events);
        info!(
            entries = surface.len(),
            context_actions = surface.context_actions().len(),
            hooks = hooks.len(),
            panels = panels.len(),
            jobs = jobs.len(),
            "command surface composed"
        );

        let responder: Arc<dyn InteractionResponder> =
            Arc::clone(&self.host) as Arc<dyn InteractionResponder>;
        let dispatcher = Arc::new(InteractionDispatcher::new(
            self.context.clone(),
            responder,
            surface,
            hooks,
        ));
        if self.dispatcher.set(dispatcher).is_err() {
            debug!("dispatcher already installed");
        }
        inner.panels = panels;
        inner.panel_routes = Some(routes);
        inner.jobs = jobs.into_iter().map(Arc::new).collect();
        inner.advance(LifecycleState::Composed)?;
        inner.advance(LifecycleState::AwaitingConnect)
    }

    /// Re-attaches every persistent panel, then asks the host to connect.
    ///
    /// The host may deliver the ready signal before `connect` returns;
    /// [`Self::handle_ready`] runs in place in that case.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Host`] when a panel cannot be re-attached or
    /// the connection fails, and [`LifecycleError::InvalidTransition`] unless
    /// the orchestrator is awaiting connection.
    pub async fn start(&self) -> LifecycleResult<()> {
        {
            let mut inner = self.inner.lock().await;
            inner.expect_state(LifecycleState::AwaitingConnect, LifecycleState::PanelsAttached)?;

            PersistentPanelReattacher::new(Arc::clone(&self.host))
                .reattach(&inner.panels)
                .await
                .map_err(|source| host_failure(LifecycleState::PanelsAttached, source))?;
            if let (Some(routes), Some(dispatcher)) =
                (inner.panel_routes.take(), self.dispatcher.get())
                && !dispatcher.install_panels(routes)
            {
                debug!("panel routes already installed");
            }
            inner.advance(LifecycleState::PanelsAttached)?;
            inner.connecting = true;
        }

        let connected = self.host.connect().await;

        let mut inner = self.inner.lock().await;
        inner.connecting = false;
        connected.map_err(|source| host_failure(LifecycleState::Connected, source))?;
        if inner.state == LifecycleState::PanelsAttached {
            inner.advance(LifecycleState::Connected)?;
        }
        Ok(())
    }

    /// Handles the host's ready signal: pushes the command surface, starts
    /// background jobs, then forwards the event to the `ready` handler.
    ///
    /// Only the first successful call has an effect; later calls are logged
    /// and ignored. A ready signal delivered while [`Self::start`] is still
    /// waiting on the host counts as the connection being established.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Host`] when the surface cannot be pushed and
    /// [`LifecycleError::InvalidTransition`] before the host is connected.
    pub async fn handle_ready(&self) -> LifecycleResult<()> {
        let dispatcher = {
            let mut inner = self.inner.lock().await;
            let current = inner.state;
            match current {
                LifecycleState::Connected => {}
                LifecycleState::PanelsAttached if inner.connecting => {
                    debug!("ready signal arrived before connect returned");
                    inner.advance(LifecycleState::Connected)?;
                }
                LifecycleState::Synced | LifecycleState::JobsRunning => {
                    debug!("ready signal repeated; command surface already synchronised");
                    return Ok(());
                }
                other => {
                    return Err(LifecycleError::InvalidTransition {
                        from: other,
                        to: LifecycleState::Synced,
                    });
                }
            }

            let dispatcher = self.dispatcher()?;
            let guild = self.context.config().server_id;
            self.host
                .sync_commands(guild, dispatcher.surface())
                .await
                .map_err(|source| host_failure(LifecycleState::Synced, source))?;
            inner.advance(LifecycleState::Synced)?;

            let handle = BackgroundJobScheduler::new().start(&inner.jobs);
            inner.running = Some(handle);
            inner.advance(LifecycleState::JobsRunning)?;
            dispatcher
        };

        dispatcher.dispatch_event(HostEvent::Ready).await;
        Ok(())
    }

    /// Returns the dispatcher the host routes interactions and events to.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::DispatchUnavailable`] before composition
    /// completes.
    pub fn dispatcher(&self) -> LifecycleResult<Arc<InteractionDispatcher>> {
        self.dispatcher
            .get()
            .cloned()
            .ok_or(LifecycleError::DispatchUnavailable)
    }

    /// Stops running background jobs. The lifecycle state is kept.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(handle) = inner.running.take() {
            info!(jobs = handle.len(), "stopping background jobs");
            handle.shutdown();
        }
    }
}

fn host_failure(stage: LifecycleState, source: ChatHostError) -> LifecycleError {
    error!(stage = %stage, error = %source, "host failure during start-up");
    LifecycleError::Host { stage, source }
}
