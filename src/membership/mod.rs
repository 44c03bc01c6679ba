//! Roster membership lookups with a time-bounded cache.
//!
//! Capabilities ask whether a member's handle appears on the club roster.
//! The roster lives in an external directory; [`CachedMembershipRoster`]
//! keeps a copy for a configured time-to-live and reports
//! [`MembershipStatus::Unknown`] when the directory cannot be reached.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The caching service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

pub use domain::{CollaboratorError, CollaboratorResult, MemberRecord, MembershipStatus};
pub use ports::{MembershipDirectory, MembershipLookup};
pub use services::CachedMembershipRoster;
