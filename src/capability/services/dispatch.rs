//! Routing of inbound interactions and host events to capability actions.
//!
//! The dispatcher is passive: the host calls into it. Every invocation runs
//! in its own task, so a failing or panicking action only affects its own
//! interaction. Failures are logged and answered with a private failure
//! embed; they never propagate to the host.

use super::{HookTable, PanelRoutes};
use crate::capability::domain::{CommandSpec, CommandSurface, HostEvent};
use crate::capability::ports::InteractionResponder;
use crate::interaction::{
    BotContext, ContextTarget, Embed, Interaction, InvocationContext, InvocationError,
    InvocationResult, Reply, ResponseHandle,
};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Title of the failure embed shown to the invoking user.
const FAILURE_TITLE: &str = "ERROR";

/// Interaction delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundInteraction {
    /// A slash command or group subcommand.
    Command {
        /// Interaction metadata.
        interaction: Interaction,
        /// Top-level command or group name.
        name: String,
        /// Subcommand name, for group invocations.
        subcommand: Option<String>,
        /// Raw argument values keyed by parameter name.
        arguments: BTreeMap<String, String>,
    },
    /// A context action on a message or user.
    ContextAction {
        /// Interaction metadata.
        interaction: Interaction,
        /// Action name.
        name: String,
        /// Targeted entity.
        target: ContextTarget,
    },
    /// A persistent panel component.
    Component {
        /// Interaction metadata.
        interaction: Interaction,
        /// Custom identifier of the used component.
        custom_id: String,
    },
}

impl InboundInteraction {
    /// Creates a command invocation from a path such as `"timer start"`.
    #[must_use]
    pub fn command(interaction: Interaction, path: &str) -> Self {
        let mut parts = path.split_whitespace();
        let name = parts.next().unwrap_or_default().to_owned();
        let subcommand = parts.next().map(str::to_owned);
        Self::Command {
            interaction,
            name,
            subcommand,
            arguments: BTreeMap::new(),
        }
    }

    /// Adds a raw argument to a command invocation. Other kinds are returned
    /// unchanged.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Command { arguments, .. } = &mut self {
            arguments.insert(name.into(), value.into());
        }
        self
    }

    /// Creates a context-action invocation.
    #[must_use]
    pub fn context_action(
        interaction: Interaction,
        name: impl Into<String>,
        target: ContextTarget,
    ) -> Self {
        Self::ContextAction {
            interaction,
            name: name.into(),
            target,
        }
    }

    /// Creates a component invocation.
    #[must_use]
    pub fn component(interaction: Interaction, custom_id: impl Into<String>) -> Self {
        Self::Component {
            interaction,
            custom_id: custom_id.into(),
        }
    }

    /// Returns the interaction metadata.
    #[must_use]
    pub const fn interaction(&self) -> &Interaction {
        match self {
            Self::Command { interaction, .. }
            | Self::ContextAction { interaction, .. }
            | Self::Component { interaction, .. } => interaction,
        }
    }

    fn route(&self) -> String {
        match self {
            Self::Command {
                name, subcommand, ..
            } => subcommand
                .as_ref()
                .map_or_else(|| name.clone(), |sub| format!("{name} {sub}")),
            Self::ContextAction { name, .. } => name.clone(),
            Self::Component { custom_id, .. } => custom_id.clone(),
        }
    }
}

/// Result of dispatching one interaction or event.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// The bound action completed.
    Completed,
    /// The bound action failed; the user was told when an interaction was
    /// involved.
    Failed(InvocationError),
    /// Nothing is bound to the route.
    Unrouted,
}

impl DispatchOutcome {
    /// Returns whether the bound action completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&InvocationError> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Completed | Self::Unrouted => None,
        }
    }
}

/// Routing table from inbound interactions and events to actions.
pub struct InteractionDispatcher {
    bot: BotContext,
    responder: Arc<dyn InteractionResponder>,
    surface: Arc<CommandSurface>,
    hooks: HookTable,
    panels: OnceLock<PanelRoutes>,
    acknowledgement_deadline: Duration,
}

impl InteractionDispatcher {
    /// Creates a dispatcher for a composed surface and hook table.
    ///
    /// Panel routes are installed separately once panels are re-attached.
    #[must_use]
    pub fn new(
        bot: BotContext,
        responder: Arc<dyn InteractionResponder>,
        surface: CommandSurface,
        hooks: HookTable,
    ) -> Self {
        let acknowledgement_deadline = bot.config().ack_deadline();
        Self {
            bot,
            responder,
            surface: Arc::new(surface),
            hooks,
            panels: OnceLock::new(),
            acknowledgement_deadline,
        }
    }

    /// Returns the composed command surface.
    #[must_use]
    pub fn surface(&self) -> &CommandSurface {
        &self.surface
    }

    /// Returns the hook table.
    #[must_use]
    pub const fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    /// Installs the panel routing table. Only the first call has an effect.
    ///
    /// Returns whether the routes were installed.
    #[must_use]
    pub fn install_panels(&self, routes: PanelRoutes) -> bool {
        self.panels.set(routes).is_ok()
    }

    /// Returns whether panel routes are installed.
    #[must_use]
    pub fn panels_installed(&self) -> bool {
        self.panels.get().is_some()
    }

    /// Dispatches an inbound interaction to its bound action.
    pub async fn dispatch(&self, inbound: InboundInteraction) -> DispatchOutcome {
        let route = inbound.route();
        let response = ResponseHandle::new(
            inbound.interaction().id,
            Arc::clone(&self.responder),
            self.acknowledgement_deadline,
        );

        let (result, echo) = match inbound {
            InboundInteraction::Command {
                interaction,
                name,
                subcommand,
                arguments,
            } => {
                let Some(spec) = self.surface.resolve(&name, subcommand.as_deref()) else {
                    return unrouted(&response, route).await;
                };
                let context = self.context(interaction, response.clone());
                let result = run_command(spec, context, &arguments).await;
                (result, arguments.into_iter().collect::<Vec<_>>())
            }
            InboundInteraction::ContextAction {
                interaction,
                name,
                target,
            } => {
                let Some(spec) = self.surface.context_action(target.kind(), &name) else {
                    return unrouted(&response, route).await;
                };
                let action = spec.action();
                let context = self.context(interaction, response.clone());
                let result = run_isolated(async move { action.invoke(context, target).await }).await;
                (result, Vec::new())
            }
            InboundInteraction::Component {
                interaction,
                custom_id,
            } => {
                let Some(panel_route) = self.panels.get().and_then(|routes| routes.get(&custom_id))
                else {
                    return unrouted(&response, route).await;
                };
                let action = panel_route.component().action();
                let context = self.context(interaction, response.clone());
                let result = run_isolated(async move { action.invoke(context).await }).await;
                (result, Vec::new())
            }
        };

        finish(&response, &route, result, &echo).await
    }

    /// Dispatches a host event to the handler bound to its hook.
    pub async fn dispatch_event(&self, event: HostEvent) -> DispatchOutcome {
        let hook = event.hook();
        let Some(binding) = self.hooks.get(hook) else {
            debug!(hook = %hook, "no handler bound to hook");
            return DispatchOutcome::Unrouted;
        };

        let action = binding.action();
        match run_isolated(async move { action.handle(event).await }).await {
            Ok(()) => {
                debug!(hook = %hook, implementation = binding.implementation(), "event handled");
                DispatchOutcome::Completed
            }
            Err(error) => {
                warn!(
                    hook = %hook,
                    implementation = binding.implementation(),
                    error = %error,
                    "event handler failed"
                );
                DispatchOutcome::Failed(error)
            }
        }
    }

    fn context(&self, interaction: Interaction, response: ResponseHandle) -> InvocationContext {
        InvocationContext::new(
            self.bot.clone(),
            interaction,
            response,
            Arc::clone(&self.surface),
        )
    }
}

impl fmt::Debug for InteractionDispatcher {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InteractionDispatcher")
            .field("surface", &self.surface)
            .field("hooks", &self.hooks)
            .field("panels", &self.panels)
            .field("acknowledgement_deadline", &self.acknowledgement_deadline)
            .finish_non_exhaustive()
    }
}

async fn unrouted(response: &ResponseHandle, route: String) -> DispatchOutcome {
    warn!(route = %route, "interaction has no bound action");
    let error = InvocationError::Unrouted(route);
    report_failure(response, &error, &[]).await;
    DispatchOutcome::Unrouted
}

async fn finish(
    response: &ResponseHandle,
    route: &str,
    result: InvocationResult<()>,
    echo: &[(String, String)],
) -> DispatchOutcome {
    match result {
        Ok(()) => {
            debug!(route, interaction = %response.interaction(), "interaction handled");
            DispatchOutcome::Completed
        }
        Err(error) => {
            warn!(
                route,
                interaction = %response.interaction(),
                error = %error,
                "interaction failed"
            );
            report_failure(response, &error, echo).await;
            DispatchOutcome::Failed(error)
        }
    }
}

async fn run_command(
    spec: &CommandSpec,
    context: InvocationContext,
    raw_arguments: &BTreeMap<String, String>,
) -> InvocationResult<()> {
    if let Some(role) = spec.required_role() {
        context.require_role(role)?;
    }
    let arguments = spec.parse_arguments(raw_arguments)?;
    let action = spec.action();
    run_isolated(async move { action.invoke(context, arguments).await }).await
}

async fn run_isolated<F>(invocation: F) -> InvocationResult<()>
where
    F: Future<Output = InvocationResult<()>> + Send + 'static,
{
    match tokio::spawn(invocation).await {
        Ok(result) => result,
        Err(join_error) => {
            warn!(panicked = join_error.is_panic(), "invocation task did not complete");
            Err(InvocationError::Panicked)
        }
    }
}

async fn report_failure(
    response: &ResponseHandle,
    error: &InvocationError,
    echo: &[(String, String)],
) {
    let embed = Embed::failure(
        FAILURE_TITLE,
        error.user_message(),
        echo.iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    if let Err(delivery_error) = response.deliver(Reply::embed(embed).ephemeral()).await {
        warn!(
            interaction = %response.interaction(),
            error = %delivery_error,
            "failure reply could not be delivered"
        );
    }
}
