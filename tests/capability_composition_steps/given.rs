//! Given steps for capability composition BDD scenarios.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::world::CompositionWorld;
use clubhouse::capability::{
    domain::{
        ButtonStyle, CapabilityDraft, CapabilityEntry, CapabilityKind, ChannelId,
        ComponentDescriptor, ComponentDraft, CommandDraft, GroupDraft, MessageId, PanelDraft,
        PanelTarget,
    },
    ports::{command_fn, component_fn},
};
use clubhouse::interaction::Reply;
use rstest_bdd_macros::given;

fn command_entry(identifier: String, documentation: String, name: Option<String>) -> CapabilityEntry {
    CapabilityEntry::with_builder(identifier, documentation, CapabilityKind::Command, move |_| {
        let draft = name
            .iter()
            .fold(CommandDraft::new(), |draft, alias| draft.named(alias.clone()));
        CapabilityDraft::Command(draft.action(command_fn(|_, _| async { Ok(()) })))
    })
}

#[given(r#"a command "{identifier}" documented as "{documentation}""#)]
fn a_documented_command(world: &mut CompositionWorld, identifier: String, documentation: String) {
    world
        .entries
        .push(command_entry(identifier, documentation, None));
}

#[given(r#"a command "{identifier}" exposed as "{name}""#)]
fn a_renamed_command(world: &mut CompositionWorld, identifier: String, name: String) {
    world.entries.push(command_entry(
        identifier,
        "Another command.".to_owned(),
        Some(name),
    ));
}

#[given(r#"a command "{identifier}" without an action"#)]
fn a_command_without_action(world: &mut CompositionWorld, identifier: String) {
    world.entries.push(CapabilityEntry::with_builder(
        identifier,
        "Never wired up.",
        CapabilityKind::Command,
        |_| CapabilityDraft::Command(CommandDraft::new()),
    ));
}

#[given(r#"a group "{group}" with subcommands "{first}" and "{second}""#)]
fn a_group(world: &mut CompositionWorld, group: String, first: String, second: String) {
    let subcommands: Vec<CapabilityEntry> = [first, second]
        .into_iter()
        .map(|name| {
            command_entry(
                format!("{group}_{name}"),
                format!("Runs {name}."),
                Some(name),
            )
        })
        .collect();
    world.entries.push(CapabilityEntry::with_builder(
        group,
        "A group of subcommands.",
        CapabilityKind::Group,
        move |_| {
            CapabilityDraft::Group(
                subcommands
                    .iter()
                    .cloned()
                    .fold(GroupDraft::new(), GroupDraft::command),
            )
        },
    ));
}

#[given(r#"a panel "{panel}" on message {message:u64} with a component "{component}""#)]
fn a_panel(world: &mut CompositionWorld, panel: String, message: u64, component: String) {
    let presses = Arc::clone(&world.presses);
    world.entries.push(CapabilityEntry::with_builder(
        panel,
        "A panel with one button.",
        CapabilityKind::PersistentPanel,
        move |_| {
            let runs = Arc::clone(&presses);
            CapabilityDraft::PersistentPanel(
                PanelDraft::new()
                    .message(PanelTarget::new(ChannelId::new(30), MessageId::new(message)))
                    .component(
                        ComponentDraft::new(
                            component.clone(),
                            ComponentDescriptor::button("Go", ButtonStyle::Primary),
                        )
                        .action(component_fn(move |context| {
                            runs.fetch_add(1, Ordering::SeqCst);
                            async move {
                                context.response().acknowledge(true).await?;
                                context.response().follow_up(Reply::text("Done.")).await
                            }
                        })),
                    ),
            )
        },
    ));
}
