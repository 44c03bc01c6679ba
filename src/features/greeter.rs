//! Lifecycle event handlers: readiness logging and the member greeting.

use crate::capability::domain::{
    Capability, CapabilityDraft, CapabilityKind, EventDraft, HostEvent,
};
use crate::capability::ports::event_fn;
use crate::interaction::{BotContext, InvocationError, InvocationResult, MemberRef, MessageContent};
use minijinja::{Environment, context};
use tracing::{debug, info};

/// Logs readiness once the command surface is live.
#[derive(Debug, Clone, Copy)]
pub struct OnReady;

impl Capability for OnReady {
    const IDENTIFIER: &'static str = "on_ready";
    const DOCUMENTATION: &'static str = "Logs that the bot is ready.";
    const KIND: CapabilityKind = CapabilityKind::EventHandler;

    fn build(context: &BotContext) -> CapabilityDraft {
        let bot = context.clone();
        CapabilityDraft::EventHandler(EventDraft::new().action(event_fn(move |_event| {
            let latency = bot.host().latency();
            let guild = bot.config().server_id;
            async move {
                info!(guild = %guild, latency_ms = latency.as_millis(), "bot ready");
                Ok(())
            }
        })))
    }
}

/// Greets new members in the welcome channel.
///
/// The greeting is rendered from the configured template with `member`
/// (a mention) and `name` (the display name).
#[derive(Debug, Clone, Copy)]
pub struct OnMemberJoin;

impl Capability for OnMemberJoin {
    const IDENTIFIER: &'static str = "on_member_join";
    const DOCUMENTATION: &'static str = "Greets members joining the server.";
    const KIND: CapabilityKind = CapabilityKind::EventHandler;

    fn build(context: &BotContext) -> CapabilityDraft {
        let bot = context.clone();
        CapabilityDraft::EventHandler(EventDraft::new().action(event_fn(move |event| {
            let greeter = bot.clone();
            async move {
                let HostEvent::MemberJoin(member) = event else {
                    return Ok(());
                };
                if member.bot {
                    debug!(user = %member.user, "not greeting bot account");
                    return Ok(());
                }
                let greeting = render_welcome(&greeter.config().welcome.template, &member)?;
                let channel = greeter.config().channels.welcome;
                greeter
                    .host()
                    .send_message(channel, &MessageContent::text(greeting))
                    .await?;
                Ok(())
            }
        })))
    }
}

/// Renders the welcome template for `member`.
///
/// # Errors
///
/// Returns [`InvocationError::TemplateRender`] when the template is
/// malformed.
pub fn render_welcome(template: &str, member: &MemberRef) -> InvocationResult<String> {
    Environment::new()
        .render_str(
            template,
            context! { member => member.mention(), name => member.display_name },
        )
        .map_err(|error| InvocationError::TemplateRender {
            template: "welcome.template",
            message: error.to_string(),
        })
}
