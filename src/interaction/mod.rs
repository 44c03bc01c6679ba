//! Invocation-side types shared by the dispatcher and capability actions.
//!
//! - [`BotContext`] and [`InvocationContext`] carry the host handle,
//!   configuration, and interaction metadata into actions
//! - [`ResponseHandle`] enforces the two-phase response protocol
//! - [`InvocationError`] is the per-invocation failure type
//! - [`Embed`], [`MessageContent`], and [`Reply`] describe outgoing content

mod context;
mod embed;
mod entity;
mod error;
mod response;

pub use context::{BotContext, Interaction, InvocationContext};
pub use embed::{
    DEFAULT_COLOR, Embed, EmbedAuthor, EmbedField, FAILURE_COLOR, InvalidColorError,
    MessageContent, Reply, parse_color,
};
pub use entity::{ContextTarget, MemberRef, MessageRef};
pub use error::{InvocationError, InvocationResult};
pub use response::{ResponseHandle, ResponseState};
