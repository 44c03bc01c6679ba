//! Start-up errors raised while validating and composing capabilities.

use super::CapabilityKind;
use thiserror::Error;

/// Fatal error raised when a capability implementation does not satisfy its
/// contract or collides with another one.
///
/// Every variant names the offending implementation so that a failed start-up
/// can be traced back to the registration that caused it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required behaviour was never supplied by the implementation.
    #[error("capability '{implementation}' does not implement required behaviour '{behaviour}'")]
    MissingBehaviour {
        /// Implementation identifier.
        implementation: String,
        /// Name of the missing behaviour.
        behaviour: String,
    },

    /// The implementation built a draft for a different kind than it was
    /// registered as.
    #[error("capability '{implementation}' is registered as {registered} but built a {built}")]
    KindMismatch {
        /// Implementation identifier.
        implementation: String,
        /// Kind declared by the registration.
        registered: CapabilityKind,
        /// Kind of the draft actually produced.
        built: CapabilityKind,
    },

    /// Two registrations share the same implementation identifier.
    #[error("capability '{0}' is registered more than once")]
    DuplicateImplementation(String),

    /// A command, group, or context-action name is invalid.
    #[error("capability '{implementation}' has invalid name '{name}': {reason}")]
    InvalidName {
        /// Implementation identifier.
        implementation: String,
        /// Rejected name.
        name: String,
        /// Validation reason.
        reason: String,
    },

    /// A description is empty or too long.
    #[error("capability '{implementation}' has an invalid description: {reason}")]
    InvalidDescription {
        /// Implementation identifier.
        implementation: String,
        /// Validation reason.
        reason: String,
    },

    /// A declared command parameter is malformed.
    #[error("capability '{implementation}' declares invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Implementation identifier.
        implementation: String,
        /// Parameter name.
        parameter: String,
        /// Validation reason.
        reason: String,
    },

    /// An event handler names a hook the host does not provide.
    #[error("capability '{implementation}' listens to unknown hook '{hook}'")]
    UnknownHook {
        /// Implementation identifier.
        implementation: String,
        /// Rejected hook name.
        hook: String,
    },

    /// A background job declares a zero interval.
    #[error("capability '{implementation}' declares a zero job interval")]
    InvalidInterval {
        /// Implementation identifier.
        implementation: String,
    },

    /// A derived component custom identifier is invalid.
    #[error("capability '{implementation}' derives invalid custom id '{custom_id}'")]
    InvalidCustomId {
        /// Implementation identifier.
        implementation: String,
        /// Rejected custom identifier.
        custom_id: String,
    },

    /// Two composed entries share a name within the same namespace.
    #[error("capability '{implementation}' reuses name '{name}' already claimed by '{existing}'")]
    DuplicateName {
        /// Implementation that attempted the registration.
        implementation: String,
        /// Conflicting name.
        name: String,
        /// Implementation that owns the name.
        existing: String,
    },

    /// Two panel components share a custom identifier.
    #[error("capability '{implementation}' reuses custom id '{custom_id}' already bound by '{existing}'")]
    DuplicateCustomId {
        /// Implementation that attempted the registration.
        implementation: String,
        /// Conflicting custom identifier.
        custom_id: String,
        /// Implementation that owns the identifier.
        existing: String,
    },
}

impl ConfigurationError {
    /// Creates a [`ConfigurationError::MissingBehaviour`] error.
    #[must_use]
    pub fn missing(implementation: &str, behaviour: impl Into<String>) -> Self {
        Self::MissingBehaviour {
            implementation: implementation.to_owned(),
            behaviour: behaviour.into(),
        }
    }

    /// Returns the identifier of the implementation that caused the error.
    #[must_use]
    pub fn implementation(&self) -> &str {
        match self {
            Self::MissingBehaviour { implementation, .. }
            | Self::KindMismatch { implementation, .. }
            | Self::InvalidName { implementation, .. }
            | Self::InvalidDescription { implementation, .. }
            | Self::InvalidParameter { implementation, .. }
            | Self::UnknownHook { implementation, .. }
            | Self::InvalidInterval { implementation }
            | Self::InvalidCustomId { implementation, .. }
            | Self::DuplicateName { implementation, .. }
            | Self::DuplicateCustomId { implementation, .. } => implementation,
            Self::DuplicateImplementation(implementation) => implementation,
        }
    }
}

/// Error returned while parsing a capability kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown capability kind: {0}")]
pub struct ParseCapabilityKindError(pub String);

/// Error returned while parsing a host hook name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown host hook: {0}")]
pub struct ParseHostHookError(pub String);
