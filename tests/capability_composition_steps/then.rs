//! Then steps for capability composition BDD scenarios.

use std::sync::atomic::Ordering;

use super::world::{CompositionWorld, run_async};
use clubhouse::capability::{
    adapters::memory::HostCall,
    domain::{ConfigurationError, InteractionId, LifecycleState, SurfaceEntry},
    services::{DispatchOutcome, LifecycleError},
};
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn load_error(world: &CompositionWorld) -> Result<&ConfigurationError, eyre::Report> {
    match world.load_result.as_ref() {
        Some(Err(LifecycleError::Configuration(error))) => Ok(error),
        other => Err(eyre::eyre!("expected a configuration error, got {other:?}")),
    }
}

#[then("loading succeeds")]
fn loading_succeeds(world: &CompositionWorld) -> Result<(), eyre::Report> {
    match world.load_result.as_ref() {
        Some(Ok(())) => Ok(()),
        other => Err(eyre::eyre!("expected loading to succeed, got {other:?}")),
    }
}

#[then("the surface has {count:usize} top-level entries")]
fn surface_has_entries(world: &CompositionWorld, count: usize) -> Result<(), eyre::Report> {
    let dispatcher = world.orchestrator()?.dispatcher().wrap_err("obtain the dispatcher")?;
    let found = dispatcher.surface().len();
    if found != count {
        return Err(eyre::eyre!("expected {count} entries, found {found}"));
    }
    Ok(())
}

#[then(r#"the entry "{name}" is described as "{description}""#)]
fn entry_described_as(
    world: &CompositionWorld,
    name: String,
    description: String,
) -> Result<(), eyre::Report> {
    let dispatcher = world.orchestrator()?.dispatcher().wrap_err("obtain the dispatcher")?;
    let entry = dispatcher
        .surface()
        .entry(&name)
        .ok_or_else(|| eyre::eyre!("no entry named '{name}'"))?;
    if entry.description() != description {
        return Err(eyre::eyre!(
            "expected '{description}', found '{}'",
            entry.description()
        ));
    }
    Ok(())
}

#[then(r#"the group "{group}" lists subcommands "{first}" and "{second}""#)]
fn group_lists_subcommands(
    world: &CompositionWorld,
    group: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let dispatcher = world.orchestrator()?.dispatcher().wrap_err("obtain the dispatcher")?;
    let Some(SurfaceEntry::Group(spec)) = dispatcher.surface().entry(&group) else {
        return Err(eyre::eyre!("no group named '{group}'"));
    };
    let names: Vec<&str> = spec
        .commands()
        .iter()
        .map(|command| command.name().as_str())
        .collect();
    if names != [first.as_str(), second.as_str()] {
        return Err(eyre::eyre!("unexpected subcommands {names:?}"));
    }
    Ok(())
}

#[then(r#""{name}" is not a top-level entry"#)]
fn not_top_level(world: &CompositionWorld, name: String) -> Result<(), eyre::Report> {
    let dispatcher = world.orchestrator()?.dispatcher().wrap_err("obtain the dispatcher")?;
    if dispatcher.surface().entry(&name).is_some() {
        return Err(eyre::eyre!("'{name}' should only exist inside its group"));
    }
    Ok(())
}

#[then(r#"loading fails because "{implementation}" is missing "{behaviour}""#)]
fn loading_fails_missing(
    world: &CompositionWorld,
    implementation: String,
    behaviour: String,
) -> Result<(), eyre::Report> {
    let error = load_error(world)?;
    let expected = ConfigurationError::missing(&implementation, behaviour);
    if *error != expected {
        return Err(eyre::eyre!("expected {expected}, got {error}"));
    }
    Ok(())
}

#[then(r#"loading fails because "{implementation}" reuses the name "{name}""#)]
fn loading_fails_duplicate(
    world: &CompositionWorld,
    implementation: String,
    name: String,
) -> Result<(), eyre::Report> {
    let error = load_error(world)?;
    match error {
        ConfigurationError::DuplicateName {
            implementation: offender,
            name: clashing,
            ..
        } if *offender == implementation && *clashing == name => Ok(()),
        other => Err(eyre::eyre!("expected a duplicate name error, got {other}")),
    }
}

#[then("start-up halted before composition")]
fn halted_before_composition(world: &CompositionWorld) -> Result<(), eyre::Report> {
    let orchestrator = world.orchestrator()?;
    let current = run_async(orchestrator.state());
    if current >= LifecycleState::Composed {
        return Err(eyre::eyre!("start-up should halt before composition, found {current}"));
    }
    if orchestrator.dispatcher().is_ok() {
        return Err(eyre::eyre!("a dispatcher was installed despite the failure"));
    }
    Ok(())
}

#[then("the panel action ran {count:usize} time")]
fn panel_action_ran(world: &CompositionWorld, count: usize) -> Result<(), eyre::Report> {
    let runs = world.presses.load(Ordering::SeqCst);
    if runs != count {
        return Err(eyre::eyre!("expected {count} runs, found {runs}"));
    }
    if !matches!(world.last_outcome, Some(DispatchOutcome::Completed)) {
        return Err(eyre::eyre!(
            "expected the press to complete, got {:?}",
            world.last_outcome
        ));
    }
    Ok(())
}

#[then("the press was acknowledged before the follow-up")]
fn press_acknowledged_first(world: &CompositionWorld) -> Result<(), eyre::Report> {
    let press = InteractionId::new(900);
    let calls = world.host.calls().wrap_err("read host calls")?;
    let sequence: Vec<&str> = calls
        .iter()
        .filter_map(|call| match call {
            HostCall::Defer { interaction, .. } if *interaction == press => Some("defer"),
            HostCall::FollowUp { interaction, .. } if *interaction == press => Some("follow_up"),
            HostCall::Respond { interaction, .. } if *interaction == press => Some("respond"),
            _ => None,
        })
        .collect();
    if sequence != ["defer", "follow_up"] {
        return Err(eyre::eyre!("unexpected response sequence {sequence:?}"));
    }
    Ok(())
}
