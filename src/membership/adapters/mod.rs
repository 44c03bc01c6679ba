//! Adapter implementations of the membership ports.

pub mod memory;
