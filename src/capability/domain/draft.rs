//! Unvalidated capability drafts produced by implementation builders.
//!
//! A draft carries optional behaviour slots. The contract validator turns a
//! draft into a validated specification and reports every empty required
//! slot as a missing behaviour.

use super::{
    CapabilityEntry, CapabilityKind, ComponentDescriptor, ContextTargetKind, DescriptorOverrides,
    PanelTarget, ParameterSpec, RoleId,
};
use crate::capability::ports::{
    CommandAction, ComponentAction, ContextAction, EventAction, JobAction,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Output of a capability builder, tagged by kind.
#[derive(Debug)]
pub enum CapabilityDraft {
    /// Standalone slash command.
    Command(CommandDraft),
    /// Named group of subcommands.
    Group(GroupDraft),
    /// Right-click action on a message or user.
    ContextAction(ContextActionDraft),
    /// Listener bound to one host hook.
    EventHandler(EventDraft),
    /// Interactive components on a previously sent message.
    PersistentPanel(PanelDraft),
    /// Fixed-interval background job.
    BackgroundJob(JobDraft),
}

impl CapabilityDraft {
    /// Returns the kind of capability this draft describes.
    #[must_use]
    pub const fn kind(&self) -> CapabilityKind {
        match self {
            Self::Command(_) => CapabilityKind::Command,
            Self::Group(_) => CapabilityKind::Group,
            Self::ContextAction(_) => CapabilityKind::ContextAction,
            Self::EventHandler(_) => CapabilityKind::EventHandler,
            Self::PersistentPanel(_) => CapabilityKind::PersistentPanel,
            Self::BackgroundJob(_) => CapabilityKind::BackgroundJob,
        }
    }
}

/// Draft of a slash command.
#[derive(Default)]
pub struct CommandDraft {
    pub(crate) overrides: DescriptorOverrides,
    pub(crate) parameters: Vec<ParameterSpec>,
    pub(crate) required_role: Option<RoleId>,
    pub(crate) action: Option<Arc<dyn CommandAction>>,
}

impl CommandDraft {
    /// Creates an empty command draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the externally visible name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.overrides.name = Some(name.into());
        self
    }

    /// Overrides the description.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.overrides.description = Some(description.into());
        self
    }

    /// Declares a parameter. Parameters keep their declaration order.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Restricts invocation to members holding `role`.
    #[must_use]
    pub const fn restricted_to(mut self, role: RoleId) -> Self {
        self.required_role = Some(role);
        self
    }

    /// Supplies the action run on invocation.
    #[must_use]
    pub fn action(mut self, action: Arc<dyn CommandAction>) -> Self {
        self.action = Some(action);
        self
    }
}

impl fmt::Debug for CommandDraft {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CommandDraft")
            .field("overrides", &self.overrides)
            .field("parameters", &self.parameters)
            .field("required_role", &self.required_role)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// Draft of a group of subcommands.
#[derive(Debug, Default)]
pub struct GroupDraft {
    pub(crate) overrides: DescriptorOverrides,
    pub(crate) commands: Vec<CapabilityEntry>,
}

impl GroupDraft {
    /// Creates an empty group draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the externally visible name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.overrides.name = Some(name.into());
        self
    }

    /// Overrides the description.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.overrides.description = Some(description.into());
        self
    }

    /// Adds a subcommand. The entry must build a command draft.
    #[must_use]
    pub fn command(mut self, entry: CapabilityEntry) -> Self {
        self.commands.push(entry);
        self
    }
}

/// Draft of a context action.
#[derive(Default)]
pub struct ContextActionDraft {
    pub(crate) overrides: DescriptorOverrides,
    pub(crate) target: Option<ContextTargetKind>,
    pub(crate) action: Option<Arc<dyn ContextAction>>,
}

impl ContextActionDraft {
    /// Creates a context-action draft applying to `target`.
    #[must_use]
    pub fn on(target: ContextTargetKind) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    /// Overrides the externally visible name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.overrides.name = Some(name.into());
        self
    }

    /// Supplies the action run on invocation.
    #[must_use]
    pub fn action(mut self, action: Arc<dyn ContextAction>) -> Self {
        self.action = Some(action);
        self
    }
}

impl fmt::Debug for ContextActionDraft {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ContextActionDraft")
            .field("overrides", &self.overrides)
            .field("target", &self.target)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// Draft of an event handler.
#[derive(Default)]
pub struct EventDraft {
    pub(crate) hook: Option<String>,
    pub(crate) action: Option<Arc<dyn EventAction>>,
}

impl EventDraft {
    /// Creates an event draft listening to the hook named after the
    /// implementation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listens to `hook` instead of the identifier-derived hook.
    #[must_use]
    pub fn on(mut self, hook: impl Into<String>) -> Self {
        self.hook = Some(hook.into());
        self
    }

    /// Supplies the handler.
    #[must_use]
    pub fn action(mut self, action: Arc<dyn EventAction>) -> Self {
        self.action = Some(action);
        self
    }
}

impl fmt::Debug for EventDraft {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EventDraft")
            .field("hook", &self.hook)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// Draft of one panel component.
pub struct ComponentDraft {
    pub(crate) name: String,
    pub(crate) descriptor: ComponentDescriptor,
    pub(crate) action: Option<Arc<dyn ComponentAction>>,
}

impl ComponentDraft {
    /// Creates a component draft; `name` feeds custom identifier derivation.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: ComponentDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
            action: None,
        }
    }

    /// Supplies the action run when the component is used.
    #[must_use]
    pub fn action(mut self, action: Arc<dyn ComponentAction>) -> Self {
        self.action = Some(action);
        self
    }
}

impl fmt::Debug for ComponentDraft {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ComponentDraft")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// Draft of a persistent panel.
#[derive(Debug, Default)]
pub struct PanelDraft {
    pub(crate) target: Option<PanelTarget>,
    pub(crate) components: Vec<ComponentDraft>,
}

impl PanelDraft {
    /// Creates an empty panel draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the previously sent message the panel lives on.
    #[must_use]
    pub const fn message(mut self, target: PanelTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Adds a component. Components keep their declaration order.
    #[must_use]
    pub fn component(mut self, component: ComponentDraft) -> Self {
        self.components.push(component);
        self
    }
}

/// Draft of a background job.
#[derive(Default)]
pub struct JobDraft {
    pub(crate) interval: Option<Duration>,
    pub(crate) action: Option<Arc<dyn JobAction>>,
}

impl JobDraft {
    /// Creates an empty job draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the job every `seconds` seconds.
    #[must_use]
    pub const fn every_secs(mut self, seconds: u64) -> Self {
        self.interval = Some(Duration::from_secs(seconds));
        self
    }

    /// Supplies the job body.
    #[must_use]
    pub fn action(mut self, action: Arc<dyn JobAction>) -> Self {
        self.action = Some(action);
        self
    }
}

impl fmt::Debug for JobDraft {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("JobDraft")
            .field("interval", &self.interval)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
