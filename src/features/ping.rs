//! Latency check.

use crate::capability::domain::{
    Capability, CapabilityDraft, CapabilityKind, CommandDraft,
};
use crate::capability::ports::command_fn;
use crate::interaction::BotContext;

/// Replies privately with the host latency in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Ping;

impl Capability for Ping {
    const IDENTIFIER: &'static str = "ping";
    const DOCUMENTATION: &'static str = "Returns the latency of the bot in milliseconds.";
    const KIND: CapabilityKind = CapabilityKind::Command;

    fn build(_context: &BotContext) -> CapabilityDraft {
        CapabilityDraft::Command(CommandDraft::new().action(command_fn(
            |context, _arguments| async move {
                let latency = context.host().latency();
                context
                    .reply_private(format!("{} ms", latency.as_millis()))
                    .await
            },
        )))
    }
}
