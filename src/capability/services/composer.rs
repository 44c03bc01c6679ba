//! Composition of validated commands into the command surface.

use crate::capability::domain::{
    CommandSpec, CommandSurface, ConfigurationError, ContextActionSpec, ContextTargetKind,
    GroupSpec, SurfaceEntry,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Assembles groups, standalone commands, and context actions into one
/// namespace. Performs no host I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandTreeComposer;

impl CommandTreeComposer {
    /// Creates a composer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Composes the command surface.
    ///
    /// Groups register first as single entries holding their subcommands.
    /// A standalone command whose implementation a group already claims is
    /// left out, so subcommands only appear inside their group.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateName`] when two top-level
    /// entries, two subcommands of one group, or two context actions of the
    /// same target kind share a name.
    pub fn compose(
        &self,
        groups: Vec<GroupSpec>,
        commands: Vec<CommandSpec>,
        context_actions: Vec<ContextActionSpec>,
    ) -> Result<CommandSurface, ConfigurationError> {
        let mut names = NameIndex::default();
        let mut entries = Vec::with_capacity(groups.len() + commands.len());

        let claimed: HashSet<String> = groups
            .iter()
            .flat_map(|group| group.commands().iter())
            .map(|command| command.implementation().to_owned())
            .collect();

        for group in groups {
            let mut subcommands = NameIndex::default();
            for command in group.commands() {
                subcommands.claim(command.name().as_str(), command.implementation())?;
            }
            names.claim(group.name().as_str(), group.implementation())?;
            debug!(
                group = %group.name(),
                subcommands = group.commands().len(),
                "group composed"
            );
            entries.push(SurfaceEntry::Group(group));
        }

        for command in commands {
            if claimed.contains(command.implementation()) {
                debug!(
                    implementation = command.implementation(),
                    "command claimed by a group; skipped at top level"
                );
                continue;
            }
            names.claim(command.name().as_str(), command.implementation())?;
            entries.push(SurfaceEntry::Command(command));
        }

        let mut context_names: HashMap<ContextTargetKind, NameIndex> = HashMap::new();
        for action in &context_actions {
            context_names
                .entry(action.target())
                .or_default()
                .claim(action.name().as_str(), action.implementation())?;
        }

        Ok(CommandSurface::new(entries, context_actions))
    }
}

#[derive(Debug, Default)]
struct NameIndex {
    owners: HashMap<String, String>,
}

impl NameIndex {
    fn claim(&mut self, name: &str, implementation: &str) -> Result<(), ConfigurationError> {
        if let Some(existing) = self.owners.get(name) {
            return Err(ConfigurationError::DuplicateName {
                implementation: implementation.to_owned(),
                name: name.to_owned(),
                existing: existing.clone(),
            });
        }
        self.owners
            .insert(name.to_owned(), implementation.to_owned());
        Ok(())
    }
}
