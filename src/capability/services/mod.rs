//! Application services that turn registered capabilities into a running
//! command surface.
//!
//! Each service owns one start-up concern; [`LifecycleOrchestrator`]
//! sequences them.

mod binder;
mod composer;
mod dispatch;
mod lifecycle;
mod reattacher;
mod scheduler;
mod validator;

pub use binder::{EventDispatchBinder, HookTable};
pub use composer::CommandTreeComposer;
pub use dispatch::{DispatchOutcome, InboundInteraction, InteractionDispatcher};
pub use lifecycle::{LifecycleError, LifecycleOrchestrator, LifecycleResult};
pub use reattacher::{PanelRoute, PanelRoutes, PersistentPanelReattacher};
pub use scheduler::{BackgroundJobScheduler, JobsHandle};
pub use validator::{ContractValidator, ValidatedCapabilities};
