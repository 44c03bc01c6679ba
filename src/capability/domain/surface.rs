//! Composed command surface and its serialisable manifest.

use super::{
    CommandName, CommandSpec, ContextActionSpec, ContextTargetKind, GroupSpec, ParameterSpec,
};
use serde::{Deserialize, Serialize};

/// One top-level entry of the command namespace.
#[derive(Debug, Clone)]
pub enum SurfaceEntry {
    /// Standalone command.
    Command(CommandSpec),
    /// Group exposing its subcommands beneath its own name.
    Group(GroupSpec),
}

impl SurfaceEntry {
    /// Returns the entry's top-level name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        match self {
            Self::Command(command) => command.name(),
            Self::Group(group) => group.name(),
        }
    }

    /// Returns the entry's description.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Command(command) => command.description(),
            Self::Group(group) => group.description(),
        }
    }

    /// Returns the identifier of the implementation that owns the entry.
    #[must_use]
    pub fn implementation(&self) -> &str {
        match self {
            Self::Command(command) => command.implementation(),
            Self::Group(group) => group.implementation(),
        }
    }
}

/// Externally visible command namespace, ready to be installed on the host.
#[derive(Debug, Clone, Default)]
pub struct CommandSurface {
    entries: Vec<SurfaceEntry>,
    context_actions: Vec<ContextActionSpec>,
}

impl CommandSurface {
    /// Creates a surface from already de-duplicated parts.
    #[must_use]
    pub const fn new(entries: Vec<SurfaceEntry>, context_actions: Vec<ContextActionSpec>) -> Self {
        Self {
            entries,
            context_actions,
        }
    }

    /// Returns the top-level entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[SurfaceEntry] {
        &self.entries
    }

    /// Returns the number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the surface exposes no slash commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the context actions.
    #[must_use]
    pub fn context_actions(&self) -> &[ContextActionSpec] {
        &self.context_actions
    }

    /// Finds a top-level entry by name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&SurfaceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name().as_str() == name)
    }

    /// Resolves an invoked command path to its command.
    ///
    /// A standalone command resolves without a subcommand; a group resolves
    /// only together with one of its subcommands.
    #[must_use]
    pub fn resolve(&self, name: &str, subcommand: Option<&str>) -> Option<&CommandSpec> {
        match (self.entry(name)?, subcommand) {
            (SurfaceEntry::Command(command), None) => Some(command),
            (SurfaceEntry::Group(group), Some(subcommand)) => group.command(subcommand),
            _ => None,
        }
    }

    /// Finds a context action by target kind and name.
    #[must_use]
    pub fn context_action(&self, target: ContextTargetKind, name: &str) -> Option<&ContextActionSpec> {
        self.context_actions
            .iter()
            .find(|action| action.target() == target && action.name().as_str() == name)
    }

    /// Builds the manifest pushed to the host and printed by the audit tool.
    #[must_use]
    pub fn manifest(&self) -> SurfaceManifest {
        let commands = self
            .entries
            .iter()
            .map(|entry| match entry {
                SurfaceEntry::Command(command) => ManifestEntry {
                    name: command.name().to_string(),
                    description: command.description().to_owned(),
                    kind: ManifestEntryKind::Command,
                    options: command.parameters().to_vec(),
                    subcommands: Vec::new(),
                },
                SurfaceEntry::Group(group) => ManifestEntry {
                    name: group.name().to_string(),
                    description: group.description().to_owned(),
                    kind: ManifestEntryKind::Group,
                    options: Vec::new(),
                    subcommands: group
                        .commands()
                        .iter()
                        .map(|command| ManifestSubcommand {
                            name: command.name().to_string(),
                            description: command.description().to_owned(),
                            options: command.parameters().to_vec(),
                        })
                        .collect(),
                },
            })
            .collect();

        let context_actions = self
            .context_actions
            .iter()
            .map(|action| ManifestContextAction {
                name: action.name().to_string(),
                target: action.target(),
            })
            .collect();

        SurfaceManifest {
            commands,
            context_actions,
        }
    }
}

/// Kind of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestEntryKind {
    /// Standalone command.
    Command,
    /// Group of subcommands.
    Group,
}

/// Host-facing description of a top-level entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Entry name.
    pub name: String,
    /// Entry description.
    pub description: String,
    /// Entry kind.
    pub kind: ManifestEntryKind,
    /// Parameters of a standalone command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParameterSpec>,
    /// Subcommands of a group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<ManifestSubcommand>,
}

/// Host-facing description of a group subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSubcommand {
    /// Subcommand name.
    pub name: String,
    /// Subcommand description.
    pub description: String,
    /// Subcommand parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParameterSpec>,
}

/// Host-facing description of a context action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestContextAction {
    /// Action name.
    pub name: String,
    /// Entity kind the action applies to.
    pub target: ContextTargetKind,
}

/// Serialisable description of the whole command surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceManifest {
    /// Top-level slash entries.
    pub commands: Vec<ManifestEntry>,
    /// Context actions.
    pub context_actions: Vec<ManifestContextAction>,
}
