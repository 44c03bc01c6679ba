//! Host identifiers and validated capability names.

use super::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length of a command, group, or context-action name.
const MAX_COMMAND_NAME_LENGTH: usize = 32;

/// Maximum length of a component custom identifier accepted by the host.
const MAX_CUSTOM_ID_LENGTH: usize = 100;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw host identifier.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw host identifier.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

snowflake_id!(
    /// Identifier of the server (guild) the bot is installed in.
    GuildId
);
snowflake_id!(
    /// Identifier of a text channel.
    ChannelId
);
snowflake_id!(
    /// Identifier of a message persisted by the host.
    MessageId
);
snowflake_id!(
    /// Identifier of a user account.
    UserId
);
snowflake_id!(
    /// Identifier of a server role.
    RoleId
);
snowflake_id!(
    /// Host-issued identifier of one inbound interaction.
    InteractionId
);

/// Process-local correlation identifier for one dispatched invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Creates a new random invocation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated externally visible name of a command, group, or context action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandName(String);

impl CommandName {
    /// Creates a validated command name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_-]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidName`] when the name is empty,
    /// too long, or contains other characters.
    pub fn new(
        implementation: &str,
        value: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        let reason = if normalized.is_empty() {
            Some("name must not be empty")
        } else if normalized.chars().count() > MAX_COMMAND_NAME_LENGTH {
            Some("name exceeds 32 characters")
        } else if !normalized.chars().all(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || character == '_'
                || character == '-'
        }) {
            Some("only lowercase alphanumerics, '-' and '_' are allowed")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigurationError::InvalidName {
                implementation: implementation.to_owned(),
                name: raw,
                reason: reason.to_owned(),
            }),
            None => Ok(Self(normalized)),
        }
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CommandName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Stable routing tag carried by an interactive panel component.
///
/// Custom identifiers are derived from the panel identifier, the component's
/// logical name, and a stable configuration seed. The host stores them on the
/// persisted message, so the same inputs must always yield the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomId(String);

impl CustomId {
    /// Derives the custom identifier `"{panel}-{component}-{seed}"`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidCustomId`] when any part is empty
    /// or the result exceeds the host's 100 character limit.
    pub fn derive(panel: &str, component: &str, seed: &str) -> Result<Self, ConfigurationError> {
        let parts = [panel.trim(), component.trim(), seed.trim()];
        let value = parts.join("-");
        if parts.iter().any(|part| part.is_empty()) || value.len() > MAX_CUSTOM_ID_LENGTH {
            return Err(ConfigurationError::InvalidCustomId {
                implementation: panel.to_owned(),
                custom_id: value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the custom identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CustomId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
