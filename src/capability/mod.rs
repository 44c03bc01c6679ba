//! Capability registration, composition, and lifecycle orchestration.
//!
//! Feature code describes what it offers by registering [`domain::Capability`]
//! implementations. The services validate those contracts, compose the
//! command surface, bind event hooks, re-attach persistent panels, schedule
//! background jobs, and route interactions once the host is connected. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
