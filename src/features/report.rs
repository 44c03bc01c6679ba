//! Message reporting for members.

use crate::capability::domain::{
    Capability, CapabilityDraft, CapabilityKind, ContextActionDraft, ContextTargetKind,
};
use crate::capability::ports::context_fn;
use crate::interaction::{
    BotContext, ContextTarget, Embed, InvocationContext, InvocationError, InvocationResult,
    MemberRef, MessageContent, MessageRef,
};

/// Colour of report embeds posted to the support channel.
const REPORT_COLOR: u32 = 0x00e6_7e22;

/// Forwards a right-clicked message to the support channel for moderators.
#[derive(Debug, Clone, Copy)]
pub struct Report;

impl Capability for Report {
    const IDENTIFIER: &'static str = "report";
    const DOCUMENTATION: &'static str = "Report a message to the moderators.";
    const KIND: CapabilityKind = CapabilityKind::ContextAction;

    fn build(_context: &BotContext) -> CapabilityDraft {
        CapabilityDraft::ContextAction(
            ContextActionDraft::on(ContextTargetKind::Message).action(context_fn(report)),
        )
    }
}

async fn report(context: InvocationContext, target: ContextTarget) -> InvocationResult<()> {
    let ContextTarget::Message(message) = target else {
        return Err(InvocationError::rejected("Only messages can be reported."));
    };

    let support = context.config().channels.support;
    let body = MessageContent::embed(report_embed(&message, context.invoker()));
    context.host().send_message(support, &body).await?;
    context
        .reply_private("Thanks, the moderators have been notified.")
        .await
}

/// Builds the embed moderators see for a reported message.
#[must_use]
pub fn report_embed(message: &MessageRef, reporter: &MemberRef) -> Embed {
    let excerpt = if message.content.trim().is_empty() {
        "*(no text content)*".to_owned()
    } else {
        message.content.clone()
    };
    Embed::new()
        .with_title("Reported message")
        .with_description(excerpt)
        .with_color(REPORT_COLOR)
        .with_field("Author", format!("<@{}>", message.author))
        .with_field("Channel", format!("<#{}>", message.channel))
        .with_field("Message", message.id.to_string())
        .with_field("Reported by", reporter.mention())
}
