//! Contract validation of registered capabilities.
//!
//! Provides [`ContractValidator`], which builds every registration against
//! the shared context and turns its draft into a validated specification.
//! Validation stops at the first failure.

use crate::capability::domain::{
    CapabilityDescriptor, CapabilityDraft, CapabilityEntry, CapabilityKind, CapabilityRegistry,
    CommandDraft, CommandSpec, ConfigurationError, ContextActionDraft, ContextActionSpec,
    CustomId, EventBinding, EventDraft, GroupDraft, GroupSpec, HostHook, JobDraft, JobSpec,
    PanelComponent, PanelDraft, PanelSpec,
};
use crate::interaction::BotContext;
use std::collections::HashSet;
use tracing::debug;

/// Validated specifications, grouped by kind, in registration order.
#[derive(Debug, Default)]
pub struct ValidatedCapabilities {
    /// Standalone commands, including any also claimed by a group.
    pub commands: Vec<CommandSpec>,
    /// Groups with their validated subcommands.
    pub groups: Vec<GroupSpec>,
    /// Context actions.
    pub context_actions: Vec<ContextActionSpec>,
    /// Event bindings.
    pub events: Vec<EventBinding>,
    /// Persistent panels.
    pub panels: Vec<PanelSpec>,
    /// Background jobs.
    pub jobs: Vec<JobSpec>,
}

impl ValidatedCapabilities {
    /// Returns the total number of validated top-level capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
            + self.groups.len()
            + self.context_actions.len()
            + self.events.len()
            + self.panels.len()
            + self.jobs.len()
    }

    /// Returns whether nothing was validated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds registrations and checks each against its contract.
#[derive(Debug, Clone)]
pub struct ContractValidator {
    context: BotContext,
}

impl ContractValidator {
    /// Creates a validator building capabilities against `context`.
    #[must_use]
    pub const fn new(context: BotContext) -> Self {
        Self { context }
    }

    /// Validates every registration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] encountered; the error names
    /// the offending implementation.
    pub fn validate(
        &self,
        registry: &CapabilityRegistry,
    ) -> Result<ValidatedCapabilities, ConfigurationError> {
        let mut identifiers = HashSet::new();
        let mut validated = ValidatedCapabilities::default();

        for entry in registry.entries() {
            if !identifiers.insert(entry.identifier()) {
                return Err(ConfigurationError::DuplicateImplementation(
                    entry.identifier().to_owned(),
                ));
            }

            match self.build(entry)? {
                CapabilityDraft::Command(draft) => {
                    validated.commands.push(validate_command(entry, draft)?);
                }
                CapabilityDraft::Group(draft) => {
                    validated.groups.push(self.validate_group(entry, draft)?);
                }
                CapabilityDraft::ContextAction(draft) => {
                    validated
                        .context_actions
                        .push(validate_context_action(entry, draft)?);
                }
                CapabilityDraft::EventHandler(draft) => {
                    validated.events.push(validate_event(entry, draft)?);
                }
                CapabilityDraft::PersistentPanel(draft) => {
                    validated.panels.push(self.validate_panel(entry, draft)?);
                }
                CapabilityDraft::BackgroundJob(draft) => {
                    validated.jobs.push(validate_job(entry, draft)?);
                }
            }

            debug!(
                implementation = entry.identifier(),
                kind = %entry.kind(),
                "capability satisfied its contract"
            );
        }

        Ok(validated)
    }

    fn build(&self, entry: &CapabilityEntry) -> Result<CapabilityDraft, ConfigurationError> {
        let draft = entry.build(&self.context);
        if draft.kind() != entry.kind() {
            return Err(ConfigurationError::KindMismatch {
                implementation: entry.identifier().to_owned(),
                registered: entry.kind(),
                built: draft.kind(),
            });
        }
        Ok(draft)
    }

    fn validate_group(
        &self,
        entry: &CapabilityEntry,
        draft: GroupDraft,
    ) -> Result<GroupSpec, ConfigurationError> {
        if draft.commands.is_empty() {
            return Err(ConfigurationError::missing(entry.identifier(), "commands"));
        }
        let descriptor =
            CapabilityDescriptor::resolve(entry.identifier(), entry.documentation(), &draft.overrides)?;

        let commands = draft
            .commands
            .iter()
            .map(|subcommand| {
                match self.build(subcommand)? {
                    CapabilityDraft::Command(command) => validate_command(subcommand, command),
                    other => Err(ConfigurationError::KindMismatch {
                        implementation: subcommand.identifier().to_owned(),
                        registered: CapabilityKind::Command,
                        built: other.kind(),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GroupSpec::new(entry.identifier(), descriptor, commands))
    }

    fn validate_panel(
        &self,
        entry: &CapabilityEntry,
        draft: PanelDraft,
    ) -> Result<PanelSpec, ConfigurationError> {
        let target = draft
            .target
            .ok_or_else(|| ConfigurationError::missing(entry.identifier(), "message"))?;
        if draft.components.is_empty() {
            return Err(ConfigurationError::missing(entry.identifier(), "components"));
        }

        let seed = self.context.config().custom_id_seed();
        let components = draft
            .components
            .into_iter()
            .map(|component| {
                let action = component.action.ok_or_else(|| {
                    ConfigurationError::missing(
                        entry.identifier(),
                        format!("component '{}' action", component.name),
                    )
                })?;
                let custom_id = CustomId::derive(entry.identifier(), &component.name, &seed)?;
                Ok(PanelComponent::new(custom_id, component.descriptor, action))
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        Ok(PanelSpec::new(entry.identifier(), target, components))
    }
}

fn validate_command(
    entry: &CapabilityEntry,
    draft: CommandDraft,
) -> Result<CommandSpec, ConfigurationError> {
    let action = draft
        .action
        .ok_or_else(|| ConfigurationError::missing(entry.identifier(), "action"))?;
    let descriptor =
        CapabilityDescriptor::resolve(entry.identifier(), entry.documentation(), &draft.overrides)?;
    Ok(CommandSpec::new(entry.identifier(), descriptor, action)
        .with_parameters(draft.parameters)?
        .with_required_role(draft.required_role))
}

fn validate_context_action(
    entry: &CapabilityEntry,
    draft: ContextActionDraft,
) -> Result<ContextActionSpec, ConfigurationError> {
    let target = draft
        .target
        .ok_or_else(|| ConfigurationError::missing(entry.identifier(), "target"))?;
    let action = draft
        .action
        .ok_or_else(|| ConfigurationError::missing(entry.identifier(), "action"))?;
    let name = CapabilityDescriptor::resolve_name(entry.identifier(), &draft.overrides)?;
    Ok(ContextActionSpec::new(entry.identifier(), name, target, action))
}

fn validate_event(
    entry: &CapabilityEntry,
    draft: EventDraft,
) -> Result<EventBinding, ConfigurationError> {
    let action = draft
        .action
        .ok_or_else(|| ConfigurationError::missing(entry.identifier(), "action"))?;
    let hook_name = draft.hook.as_deref().unwrap_or(entry.identifier());
    let hook = HostHook::try_from(hook_name).map_err(|_| ConfigurationError::UnknownHook {
        implementation: entry.identifier().to_owned(),
        hook: hook_name.to_owned(),
    })?;
    Ok(EventBinding::new(entry.identifier(), hook, action))
}

fn validate_job(entry: &CapabilityEntry, draft: JobDraft) -> Result<JobSpec, ConfigurationError> {
    let action = draft
        .action
        .ok_or_else(|| ConfigurationError::missing(entry.identifier(), "action"))?;
    let interval = draft
        .interval
        .ok_or_else(|| ConfigurationError::missing(entry.identifier(), "interval"))?;
    if interval.is_zero() {
        return Err(ConfigurationError::InvalidInterval {
            implementation: entry.identifier().to_owned(),
        });
    }
    Ok(JobSpec::new(entry.identifier(), interval, action))
}
