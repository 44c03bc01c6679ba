//! Persistent panels: member verification and support requests.
//!
//! Both panels answer in two phases: the interaction is acknowledged
//! privately first, then the outcome is delivered as a follow-up once the
//! roster or the support channel has been reached.

use crate::capability::domain::{
    ButtonStyle, CapabilityDraft, CapabilityEntry, CapabilityKind, ComponentDescriptor,
    ComponentDraft, PanelDraft,
};
use crate::capability::ports::component_fn;
use crate::interaction::{Embed, InvocationContext, InvocationResult, MessageContent, Reply};
use crate::membership::{MembershipLookup, MembershipStatus};
use std::sync::Arc;

/// Implementation identifier of the verification panel.
pub const VERIFY_PANEL: &str = "verify";

/// Implementation identifier of the support panel.
pub const SUPPORT_PANEL: &str = "support";

/// Colour of support ticket embeds.
const TICKET_COLOR: u32 = 0x000e_c940;

/// Builds the verification panel. Its button grants the member role to
/// members found on the roster.
#[must_use]
pub fn verify_panel(roster: Arc<dyn MembershipLookup>) -> CapabilityEntry {
    CapabilityEntry::with_builder(
        VERIFY_PANEL,
        "Verification panel granting the member role.",
        CapabilityKind::PersistentPanel,
        move |bot| {
            let lookup = Arc::clone(&roster);
            CapabilityDraft::PersistentPanel(
                PanelDraft::new().message(bot.config().panels.verify).component(
                    ComponentDraft::new(
                        "button",
                        ComponentDescriptor::button("Verify", ButtonStyle::Primary),
                    )
                    .action(component_fn(move |context| {
                        let members = Arc::clone(&lookup);
                        async move { verify(context, members.as_ref()).await }
                    })),
                ),
            )
        },
    )
}

async fn verify(context: InvocationContext, roster: &dyn MembershipLookup) -> InvocationResult<()> {
    let member_role = context.config().roles.member;
    if context.invoker().has_role(member_role) {
        return context.reply_private("You are already verified.").await;
    }

    context.response().acknowledge(true).await?;
    let invoker = context.invoker();
    let message = match roster.status(&invoker.handle).await {
        MembershipStatus::Member => {
            let guild = context.interaction().guild;
            context
                .host()
                .add_role(guild, invoker.user, member_role)
                .await?;
            "You are verified. Welcome to the club!"
        }
        MembershipStatus::NotMember => {
            "Your account is not on the club roster. Register with the club first, then press Verify again."
        }
        MembershipStatus::Unknown => {
            "Your membership could not be checked right now. Please try again later."
        }
    };
    context.response().follow_up(Reply::text(message)).await
}

/// Builds the support panel. Its button opens a ticket in the support
/// channel on behalf of the member.
#[must_use]
pub fn support_panel() -> CapabilityEntry {
    CapabilityEntry::with_builder(
        SUPPORT_PANEL,
        "Support panel opening help tickets.",
        CapabilityKind::PersistentPanel,
        |bot| {
            CapabilityDraft::PersistentPanel(
                PanelDraft::new().message(bot.config().panels.support).component(
                    ComponentDraft::new(
                        "open",
                        ComponentDescriptor::button("Get help", ButtonStyle::Success),
                    )
                    .action(component_fn(open_ticket)),
                ),
            )
        },
    )
}

async fn open_ticket(context: InvocationContext) -> InvocationResult<()> {
    context.response().acknowledge(true).await?;

    let invoker = context.invoker();
    let ticket = Embed::new()
        .with_author(invoker.display_name.clone(), None)
        .with_title("Support request")
        .with_description(format!(
            "{} asked for help from the support panel.",
            invoker.display_name
        ))
        .with_color(TICKET_COLOR)
        .with_field("Discord Mention", invoker.mention());
    let support = context.config().channels.support;
    context
        .host()
        .send_message(support, &MessageContent::embed(ticket))
        .await?;

    context
        .response()
        .follow_up(Reply::text(
            "Successfully opened a support ticket. Expect a response from a board member soon.",
        ))
        .await
}
