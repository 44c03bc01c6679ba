//! Port contracts for capability behaviour and the chat host.
//!
//! Ports define the seams between capability implementations, the
//! orchestration services, and the platform adapter.

pub mod action;
pub mod host;

pub use action::{
    CommandAction, ComponentAction, ContextAction, EventAction, JobAction, command_fn,
    component_fn, context_fn, event_fn, job_fn,
};
pub use host::{ChatHost, ChatHostError, ChatHostResult, InteractionResponder};
