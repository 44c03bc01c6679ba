//! Domain model for capability registration and composition.
//!
//! Capabilities are registered as drafts, validated into specifications, and
//! composed into the command surface, hook table, panels, and jobs the
//! orchestrator activates. Host concerns stay outside the domain boundary.

mod command;
mod descriptor;
mod draft;
mod error;
mod event;
mod ids;
mod job;
mod kind;
mod lifecycle;
mod panel;
mod registry;
mod surface;

pub use command::{
    CommandArguments, CommandSpec, ContextActionSpec, ContextTargetKind, GroupSpec, ParameterSpec,
    ParameterType,
};
pub use descriptor::{CapabilityDescriptor, DescriptorOverrides};
pub use draft::{
    CapabilityDraft, CommandDraft, ComponentDraft, ContextActionDraft, EventDraft, GroupDraft,
    JobDraft, PanelDraft,
};
pub use error::{ConfigurationError, ParseCapabilityKindError, ParseHostHookError};
pub use event::{EventBinding, HostEvent, HostHook};
pub use ids::{
    ChannelId, CommandName, CustomId, GuildId, InteractionId, InvocationId, MessageId, RoleId,
    UserId,
};
pub use job::{JobError, JobResult, JobSpec};
pub use kind::CapabilityKind;
pub use lifecycle::LifecycleState;
pub use panel::{ButtonStyle, ComponentDescriptor, PanelComponent, PanelSpec, PanelTarget};
pub use registry::{Capability, CapabilityBuilder, CapabilityEntry, CapabilityRegistry};
pub use surface::{
    CommandSurface, ManifestContextAction, ManifestEntry, ManifestEntryKind, ManifestSubcommand,
    SurfaceEntry, SurfaceManifest,
};
