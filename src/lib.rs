//! Clubhouse: capability registration and lifecycle orchestration for a
//! community chat bot.
//!
//! Feature code declares commands, command groups, context actions, event
//! handlers, persistent panels, and background jobs as explicit registry
//! entries. The orchestrator validates every registration up front, composes
//! the command surface, re-attaches panels before connecting, pushes the
//! surface once the host is ready, and then starts the jobs.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: capability contracts and specifications
//! - **Ports**: abstract host, responder, and roster interfaces
//! - **Adapters**: in-memory implementations for tests and tooling
//! - **Services**: validation, composition, binding, scheduling, dispatch,
//!   and lifecycle orchestration
//!
//! # Modules
//!
//! - [`capability`]: registration, composition, and lifecycle
//! - [`interaction`]: invocation context, response protocol, and content
//! - [`membership`]: cached roster lookups
//! - [`features`]: built-in capabilities
//! - [`config`]: start-up configuration
//! - [`telemetry`]: structured logging set-up

pub mod capability;
pub mod config;
pub mod features;
pub mod interaction;
pub mod membership;
pub mod telemetry;
