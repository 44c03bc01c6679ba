//! Personal stopwatch exposed as the `timer` command group.

use crate::capability::domain::{
    CapabilityDraft, CapabilityEntry, CapabilityKind, CommandDraft, GroupDraft, UserId,
};
use crate::capability::ports::command_fn;
use crate::interaction::{InvocationError, InvocationResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// Running timers, one per member.
#[derive(Debug, Default)]
pub struct TimerBoard {
    started: Mutex<HashMap<UserId, Instant>>,
}

impl TimerBoard {
    /// Starts a timer for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Rejected`] when the user already has one
    /// running.
    pub fn start(&self, user: UserId) -> InvocationResult<()> {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        if started.contains_key(&user) {
            return Err(InvocationError::rejected(
                "You already have a timer running. End it with `/timer end`.",
            ));
        }
        started.insert(user, Instant::now());
        Ok(())
    }

    /// Stops the timer of `user` and returns the elapsed time.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Rejected`] when the user has no timer
    /// running.
    pub fn end(&self, user: UserId) -> InvocationResult<Duration> {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        started
            .remove(&user)
            .map(|start| start.elapsed())
            .ok_or_else(|| {
                InvocationError::rejected("You have no timer running. Start one with `/timer start`.")
            })
    }
}

/// Formats a duration as hours, minutes, and seconds.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total.div_euclid(SECONDS_PER_HOUR);
    let minutes = total
        .rem_euclid(SECONDS_PER_HOUR)
        .div_euclid(SECONDS_PER_MINUTE);
    let seconds = total.rem_euclid(SECONDS_PER_MINUTE);
    format!("{hours}h {minutes}m {seconds}s")
}

/// Builds the `timer` group with its `start` and `end` subcommands sharing
/// `board`.
#[must_use]
pub fn timer_group(board: Arc<TimerBoard>) -> CapabilityEntry {
    let start_board = Arc::clone(&board);
    let start = CapabilityEntry::with_builder(
        "timer_start",
        "Starts a personal timer.",
        CapabilityKind::Command,
        move |_| {
            let timers = Arc::clone(&start_board);
            CapabilityDraft::Command(CommandDraft::new().named("start").action(command_fn(
                move |context, _arguments| {
                    let outcome = timers.start(context.invoker().user);
                    async move {
                        outcome?;
                        context.reply_private("Timer started.").await
                    }
                },
            )))
        },
    );

    let end = CapabilityEntry::with_builder(
        "timer_end",
        "Stops your timer and shows the elapsed time.",
        CapabilityKind::Command,
        move |_| {
            let timers = Arc::clone(&board);
            CapabilityDraft::Command(CommandDraft::new().named("end").action(command_fn(
                move |context, _arguments| {
                    let outcome = timers.end(context.invoker().user);
                    async move {
                        let elapsed = outcome?;
                        context
                            .reply_private(format!(
                                "Timer stopped after {}.",
                                format_elapsed(elapsed)
                            ))
                            .await
                    }
                },
            )))
        },
    );

    CapabilityEntry::with_builder(
        "timer",
        "Start and stop a personal timer.",
        CapabilityKind::Group,
        move |_| {
            CapabilityDraft::Group(
                GroupDraft::new()
                    .command(start.clone())
                    .command(end.clone()),
            )
        },
    )
}
