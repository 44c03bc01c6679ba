//! Command listing.

use crate::capability::domain::{
    Capability, CapabilityDraft, CapabilityKind, CommandDraft, CommandSpec, CommandSurface,
    SurfaceEntry,
};
use crate::capability::ports::command_fn;
use crate::interaction::{BotContext, DEFAULT_COLOR, Embed, Reply};
use std::fmt::Write as _;

/// Replies privately with every slash command and what it does.
#[derive(Debug, Clone, Copy)]
pub struct Help;

impl Capability for Help {
    const IDENTIFIER: &'static str = "help";
    const DOCUMENTATION: &'static str = "Returns the list of slash commands.";
    const KIND: CapabilityKind = CapabilityKind::Command;

    fn build(_context: &BotContext) -> CapabilityDraft {
        CapabilityDraft::Command(CommandDraft::new().action(command_fn(
            |context, _arguments| async move {
                let embed = Embed::new()
                    .with_title("Commands")
                    .with_description(render_help(context.surface()))
                    .with_color(DEFAULT_COLOR);
                context.response().reply(Reply::embed(embed).ephemeral()).await
            },
        )))
    }
}

/// Renders one line per command, listing group subcommands under the group
/// name. Role-restricted commands are marked.
#[must_use]
pub fn render_help(surface: &CommandSurface) -> String {
    let mut listing = String::new();
    for entry in surface.entries() {
        match entry {
            SurfaceEntry::Command(command) => push_line(&mut listing, None, command),
            SurfaceEntry::Group(group) => {
                for command in group.commands() {
                    push_line(&mut listing, Some(group.name().as_str()), command);
                }
            }
        }
    }
    listing
}

fn push_line(listing: &mut String, group: Option<&str>, command: &CommandSpec) {
    let path = group.map_or_else(
        || command.name().as_str().to_owned(),
        |name| format!("{name} {}", command.name()),
    );
    let restricted = if command.required_role().is_some() {
        " (moderators)"
    } else {
        ""
    };
    if writeln!(listing, "/{path}: {}{restricted}", command.description()).is_err() {
        tracing::debug!("help listing could not be extended");
    }
}
