//! Behaviour contracts supplied by capability implementations.
//!
//! Each capability kind binds one action trait. The `*_fn` helpers adapt
//! async closures so simple implementations need no named type.

use crate::capability::domain::{CommandArguments, HostEvent, JobResult};
use crate::interaction::{ContextTarget, InvocationContext, InvocationResult};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Action run when a slash command is invoked.
#[async_trait]
pub trait CommandAction: Send + Sync {
    /// Runs the command with validated arguments.
    ///
    /// # Errors
    ///
    /// Returns [`crate::interaction::InvocationError`] when the command fails;
    /// the dispatcher reports it to the invoking user.
    async fn invoke(
        &self,
        context: InvocationContext,
        arguments: CommandArguments,
    ) -> InvocationResult<()>;
}

/// Action run when a context action is used on a message or user.
#[async_trait]
pub trait ContextAction: Send + Sync {
    /// Runs the action against the targeted entity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::interaction::InvocationError`] when the action fails.
    async fn invoke(&self, context: InvocationContext, target: ContextTarget)
    -> InvocationResult<()>;
}

/// Action run when a persistent panel component is used.
#[async_trait]
pub trait ComponentAction: Send + Sync {
    /// Runs the component action.
    ///
    /// # Errors
    ///
    /// Returns [`crate::interaction::InvocationError`] when the action fails.
    async fn invoke(&self, context: InvocationContext) -> InvocationResult<()>;
}

/// Handler bound to one host hook.
#[async_trait]
pub trait EventAction: Send + Sync {
    /// Handles one host event.
    ///
    /// # Errors
    ///
    /// Returns [`crate::interaction::InvocationError`] when handling fails;
    /// the failure is logged and never reaches the host.
    async fn handle(&self, event: HostEvent) -> InvocationResult<()>;
}

/// Body of a fixed-interval background job.
#[async_trait]
pub trait JobAction: Send + Sync {
    /// Runs one iteration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::capability::domain::JobError`] when the iteration
    /// fails; the scheduler logs it and keeps the schedule.
    async fn run(&self) -> JobResult;
}

struct FnAction<F>(F);

#[async_trait]
impl<F, Fut> CommandAction for FnAction<F>
where
    F: Fn(InvocationContext, CommandArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult<()>> + Send + 'static,
{
    async fn invoke(
        &self,
        context: InvocationContext,
        arguments: CommandArguments,
    ) -> InvocationResult<()> {
        (self.0)(context, arguments).await
    }
}

/// Adapts an async closure into a [`CommandAction`].
pub fn command_fn<F, Fut>(action: F) -> Arc<dyn CommandAction>
where
    F: Fn(InvocationContext, CommandArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult<()>> + Send + 'static,
{
    Arc::new(FnAction(action))
}

struct FnContextAction<F>(F);

#[async_trait]
impl<F, Fut> ContextAction for FnContextAction<F>
where
    F: Fn(InvocationContext, ContextTarget) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult<()>> + Send + 'static,
{
    async fn invoke(
        &self,
        context: InvocationContext,
        target: ContextTarget,
    ) -> InvocationResult<()> {
        (self.0)(context, target).await
    }
}

/// Adapts an async closure into a [`ContextAction`].
pub fn context_fn<F, Fut>(action: F) -> Arc<dyn ContextAction>
where
    F: Fn(InvocationContext, ContextTarget) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult<()>> + Send + 'static,
{
    Arc::new(FnContextAction(action))
}

struct FnComponentAction<F>(F);

#[async_trait]
impl<F, Fut> ComponentAction for FnComponentAction<F>
where
    F: Fn(InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult<()>> + Send + 'static,
{
    async fn invoke(&self, context: InvocationContext) -> InvocationResult<()> {
        (self.0)(context).await
    }
}

/// Adapts an async closure into a [`ComponentAction`].
pub fn component_fn<F, Fut>(action: F) -> Arc<dyn ComponentAction>
where
    F: Fn(InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult<()>> + Send + 'static,
{
    Arc::new(FnComponentAction(action))
}

struct FnEventAction<F>(F);

#[async_trait]
impl<F, Fut> EventAction for FnEventAction<F>
where
    F: Fn(HostEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult<()>> + Send + 'static,
{
    async fn handle(&self, event: HostEvent) -> InvocationResult<()> {
        (self.0)(event).await
    }
}

/// Adapts an async closure into an [`EventAction`].
pub fn event_fn<F, Fut>(action: F) -> Arc<dyn EventAction>
where
    F: Fn(HostEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult<()>> + Send + 'static,
{
    Arc::new(FnEventAction(action))
}

struct FnJobAction<F>(F);

#[async_trait]
impl<F, Fut> JobAction for FnJobAction<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = JobResult> + Send + 'static,
{
    async fn run(&self) -> JobResult {
        (self.0)().await
    }
}

/// Adapts an async closure into a [`JobAction`].
pub fn job_fn<F, Fut>(action: F) -> Arc<dyn JobAction>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = JobResult> + Send + 'static,
{
    Arc::new(FnJobAction(action))
}
