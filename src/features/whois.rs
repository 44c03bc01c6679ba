//! Roster lookup on a right-clicked member.

use crate::capability::domain::{
    CapabilityDraft, CapabilityEntry, CapabilityKind, ContextActionDraft, ContextTargetKind,
};
use crate::capability::ports::context_fn;
use crate::interaction::{ContextTarget, InvocationError};
use crate::membership::MembershipLookup;
use std::sync::Arc;

/// Builds the `whois` user action, which tells the invoker privately
/// whether the member is on the club roster.
#[must_use]
pub fn whois(roster: Arc<dyn MembershipLookup>) -> CapabilityEntry {
    CapabilityEntry::with_builder(
        "whois",
        "Show whether a member is on the club roster.",
        CapabilityKind::ContextAction,
        move |_| {
            let lookup = Arc::clone(&roster);
            CapabilityDraft::ContextAction(ContextActionDraft::on(ContextTargetKind::User).action(
                context_fn(move |context, target| {
                    let members = Arc::clone(&lookup);
                    async move {
                        let ContextTarget::User(member) = target else {
                            return Err(InvocationError::rejected("Pick a member to look up."));
                        };
                        let status = members.status(&member.handle).await;
                        context
                            .reply_private(status.describe(&member.display_name))
                            .await
                    }
                }),
            ))
        },
    )
}
