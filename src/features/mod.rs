//! Built-in capabilities of the club bot.
//!
//! [`registry`] lists every built-in capability explicitly; nothing is
//! discovered at runtime. Capabilities needing shared collaborators (the
//! roster, the timer board) are registered through builder closures that
//! capture them.

mod greeter;
mod help;
mod messages;
mod panels;
mod ping;
mod report;
mod roster;
mod timer;
mod whois;

pub use greeter::{OnMemberJoin, OnReady, render_welcome};
pub use help::Help;
pub use messages::{EmbedInput, MessageEdit, MessageSend};
pub use panels::{SUPPORT_PANEL, VERIFY_PANEL, support_panel, verify_panel};
pub use ping::Ping;
pub use report::Report;
pub use roster::roster_refresh;
pub use timer::{TimerBoard, timer_group};
pub use whois::whois;

use crate::capability::domain::{CapabilityEntry, CapabilityRegistry};
use crate::membership::MembershipLookup;
use std::sync::Arc;

/// Builds the registry of every built-in capability.
///
/// `roster` answers the membership questions of `whois`, the verification
/// panel, and the periodic roster refresh.
#[must_use]
pub fn registry(roster: &Arc<dyn MembershipLookup>) -> CapabilityRegistry {
    CapabilityRegistry::new()
        .with(CapabilityEntry::of::<Ping>())
        .with(CapabilityEntry::of::<MessageSend>())
        .with(CapabilityEntry::of::<MessageEdit>())
        .with(CapabilityEntry::of::<Help>())
        .with(timer_group(Arc::new(TimerBoard::default())))
        .with(CapabilityEntry::of::<Report>())
        .with(whois(Arc::clone(roster)))
        .with(verify_panel(Arc::clone(roster)))
        .with(support_panel())
        .with(CapabilityEntry::of::<OnReady>())
        .with(CapabilityEntry::of::<OnMemberJoin>())
        .with(roster_refresh(Arc::clone(roster)))
}
