//! Adapter implementations for capability ports.
//!
//! Only the in-memory host ships with the crate; platform adapters live with
//! the deployment that embeds it.

pub mod memory;
