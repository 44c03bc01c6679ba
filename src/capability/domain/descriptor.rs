//! Explicit name/description descriptors resolved once at registration.

use super::{CommandName, ConfigurationError};
use serde::{Deserialize, Serialize};

/// Maximum length of a command or group description accepted by the host.
const MAX_DESCRIPTION_LENGTH: usize = 100;

/// Optional overrides an implementation supplies for its descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorOverrides {
    /// Externally visible name replacing the implementation identifier.
    pub name: Option<String>,
    /// Description replacing the implementation documentation text.
    pub description: Option<String>,
}

/// Resolved externally visible name and description of a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    name: CommandName,
    description: String,
}

impl CapabilityDescriptor {
    /// Resolves the descriptor of an implementation.
    ///
    /// The name defaults to `identifier` and the description to the first
    /// paragraph of `documentation`, unless overridden.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidName`] when the resolved name is
    /// invalid, or [`ConfigurationError::InvalidDescription`] when the
    /// resolved description is empty or longer than 100 characters.
    pub fn resolve(
        identifier: &str,
        documentation: &str,
        overrides: &DescriptorOverrides,
    ) -> Result<Self, ConfigurationError> {
        let name = CommandName::new(
            identifier,
            overrides.name.as_deref().unwrap_or(identifier),
        )?;
        let description = overrides
            .description
            .as_deref()
            .map_or_else(|| first_paragraph(documentation), collapse_whitespace);

        if description.is_empty() {
            return Err(ConfigurationError::InvalidDescription {
                implementation: identifier.to_owned(),
                reason: "description must not be empty".to_owned(),
            });
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ConfigurationError::InvalidDescription {
                implementation: identifier.to_owned(),
                reason: "description exceeds 100 characters".to_owned(),
            });
        }

        Ok(Self { name, description })
    }

    /// Resolves only the name of an implementation, for capabilities whose
    /// host representation carries no description.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidName`] when the resolved name is
    /// invalid.
    pub fn resolve_name(
        identifier: &str,
        overrides: &DescriptorOverrides,
    ) -> Result<CommandName, ConfigurationError> {
        CommandName::new(
            identifier,
            overrides.name.as_deref().unwrap_or(identifier),
        )
    }

    /// Returns the resolved name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the resolved description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Splits the descriptor into its parts.
    #[must_use]
    pub fn into_parts(self) -> (CommandName, String) {
        (self.name, self.description)
    }
}

fn first_paragraph(documentation: &str) -> String {
    let paragraph = documentation
        .trim()
        .split("\n\n")
        .next()
        .unwrap_or_default();
    collapse_whitespace(paragraph)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
