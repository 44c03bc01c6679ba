//! Per-invocation errors.

use crate::capability::domain::RoleId;
use crate::capability::ports::ChatHostError;
use crate::membership::CollaboratorError;
use thiserror::Error;

/// Result type for action invocations.
pub type InvocationResult<T> = Result<T, InvocationError>;

/// Failure of one command, context-action, component, or event invocation.
///
/// Invocation errors never escape the dispatcher: they are logged and turned
/// into a private failure reply for the invoking user.
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    /// The invoker lacks the role the capability requires.
    #[error("you need the <@&{role}> role to use this")]
    MissingRole {
        /// Required role.
        role: RoleId,
    },

    /// A required argument was not supplied.
    #[error("missing required option '{parameter}'")]
    MissingArgument {
        /// Parameter name.
        parameter: String,
    },

    /// An argument was supplied for an undeclared parameter.
    #[error("unknown option '{parameter}'")]
    UnknownArgument {
        /// Parameter name.
        parameter: String,
    },

    /// An argument could not be converted to its declared type.
    #[error("invalid value for option '{parameter}': {reason}")]
    InvalidArgument {
        /// Parameter name.
        parameter: String,
        /// Conversion failure reason.
        reason: String,
    },

    /// The action rejected its input with a user-facing explanation.
    #[error("{0}")]
    Rejected(String),

    /// The host deadline for acknowledging the interaction has passed.
    #[error("the interaction expired before it was acknowledged")]
    AcknowledgementExpired,

    /// A response operation is not valid in the current response state.
    #[error("cannot {operation} an interaction whose response is {state}")]
    InvalidResponseState {
        /// Attempted operation.
        operation: &'static str,
        /// Current response state.
        state: &'static str,
    },

    /// No route exists for the inbound interaction.
    #[error("'{0}' is not available")]
    Unrouted(String),

    /// An external collaborator was unavailable.
    #[error("a required service is unavailable: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// A host operation failed.
    #[error("the chat platform rejected the request: {0}")]
    Host(#[from] ChatHostError),

    /// A configured message template failed to render.
    #[error("template '{template}' could not be rendered: {message}")]
    TemplateRender {
        /// Template setting name.
        template: &'static str,
        /// Renderer error message.
        message: String,
    },

    /// The action panicked.
    #[error("the action stopped unexpectedly")]
    Panicked,
}

impl InvocationError {
    /// Creates a [`InvocationError::Rejected`] error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Returns the text shown to the invoking user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Host(_) | Self::TemplateRender { .. } | Self::Panicked => {
                "Something went wrong while handling this. Please try again later.".to_owned()
            }
            Self::Collaborator(_) => {
                "A service this depends on is unavailable right now. Please try again later."
                    .to_owned()
            }
            other => capitalize(&other.to_string()),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut characters = text.chars();
    characters.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(characters).collect()
    })
}
