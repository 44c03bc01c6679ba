//! Two-phase interaction response protocol.
//!
//! The host requires every interaction to be answered within a short
//! deadline. Quick actions answer once with [`ResponseHandle::reply`]. Slow
//! actions first [`ResponseHandle::acknowledge`] the interaction and later
//! deliver the result with [`ResponseHandle::follow_up`].
//!
//! ```text
//! Pending --reply--------------> Delivered
//! Pending --acknowledge--> Acknowledged --follow_up--> Delivered
//! ```

use super::{InvocationError, InvocationResult, Reply};
use crate::capability::domain::InteractionId;
use crate::capability::ports::InteractionResponder;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// State of an interaction response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    /// Nothing has been sent yet; the acknowledgement deadline applies.
    Pending,
    /// The interaction was acknowledged and awaits its follow-up.
    Acknowledged {
        /// Whether the eventual response is private to the invoker.
        ephemeral: bool,
    },
    /// A final response was delivered.
    Delivered,
}

impl ResponseState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Acknowledged { .. } => "acknowledged",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for ResponseState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Shared handle driving the response to one interaction.
///
/// Clones share the same state, so the dispatcher can inspect what an action
/// already sent before reporting a failure.
#[derive(Clone)]
pub struct ResponseHandle {
    interaction: InteractionId,
    responder: Arc<dyn InteractionResponder>,
    deadline: Instant,
    state: Arc<Mutex<ResponseState>>,
}

impl ResponseHandle {
    /// Creates a pending response whose acknowledgement deadline starts now.
    #[must_use]
    pub fn new(
        interaction: InteractionId,
        responder: Arc<dyn InteractionResponder>,
        acknowledgement_deadline: Duration,
    ) -> Self {
        Self {
            interaction,
            responder,
            deadline: Instant::now() + acknowledgement_deadline,
            state: Arc::new(Mutex::new(ResponseState::Pending)),
        }
    }

    /// Returns the interaction this handle answers.
    #[must_use]
    pub const fn interaction(&self) -> InteractionId {
        self.interaction
    }

    /// Returns the instant by which the interaction must be acknowledged.
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Returns the current response state.
    pub async fn state(&self) -> ResponseState {
        *self.state.lock().await
    }

    /// Acknowledges the interaction without content.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::AcknowledgementExpired`] after the deadline,
    /// [`InvocationError::InvalidResponseState`] when the interaction was
    /// already answered, or host errors.
    pub async fn acknowledge(&self, ephemeral: bool) -> InvocationResult<()> {
        let mut state = self.state.lock().await;
        self.ensure_pending(*state, "acknowledge")?;
        self.responder.defer(self.interaction, ephemeral).await?;
        *state = ResponseState::Acknowledged { ephemeral };
        Ok(())
    }

    /// Answers the interaction directly, in a single step.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::AcknowledgementExpired`] after the deadline,
    /// [`InvocationError::InvalidResponseState`] when the interaction was
    /// already acknowledged or answered, or host errors.
    pub async fn reply(&self, reply: Reply) -> InvocationResult<()> {
        let mut state = self.state.lock().await;
        self.ensure_pending(*state, "reply to")?;
        self.responder.respond(self.interaction, &reply).await?;
        *state = ResponseState::Delivered;
        Ok(())
    }

    /// Delivers content after an acknowledgement, or adds a further message
    /// after a delivered response.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::InvalidResponseState`] when the interaction
    /// is still pending, or host errors.
    pub async fn follow_up(&self, mut reply: Reply) -> InvocationResult<()> {
        let mut state = self.state.lock().await;
        match *state {
            ResponseState::Pending => Err(InvocationError::InvalidResponseState {
                operation: "follow up",
                state: ResponseState::Pending.as_str(),
            }),
            ResponseState::Acknowledged { ephemeral } => {
                reply.ephemeral |= ephemeral;
                self.responder.follow_up(self.interaction, &reply).await?;
                *state = ResponseState::Delivered;
                Ok(())
            }
            ResponseState::Delivered => {
                self.responder.follow_up(self.interaction, &reply).await?;
                Ok(())
            }
        }
    }

    /// Sends `reply` through whichever phase the response is in.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::reply`] or [`Self::follow_up`].
    pub async fn deliver(&self, reply: Reply) -> InvocationResult<()> {
        if self.state().await == ResponseState::Pending {
            self.reply(reply).await
        } else {
            self.follow_up(reply).await
        }
    }

    fn ensure_pending(&self, state: ResponseState, operation: &'static str) -> InvocationResult<()> {
        if state != ResponseState::Pending {
            return Err(InvocationError::InvalidResponseState {
                operation,
                state: state.as_str(),
            });
        }
        if Instant::now() >= self.deadline {
            return Err(InvocationError::AcknowledgementExpired);
        }
        Ok(())
    }
}

impl fmt::Debug for ResponseHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResponseHandle")
            .field("interaction", &self.interaction)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
