//! Persistent panel specifications.

use super::{ChannelId, CustomId, MessageId};
use crate::capability::ports::ComponentAction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Location of the previously sent message a panel lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelTarget {
    /// Channel holding the message.
    pub channel: ChannelId,
    /// Message carrying the rendered components.
    pub message: MessageId,
}

impl PanelTarget {
    /// Creates a panel target.
    #[must_use]
    pub const fn new(channel: ChannelId, message: MessageId) -> Self {
        Self { channel, message }
    }
}

/// Visual style of a button component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    /// Brand-coloured button.
    #[default]
    Primary,
    /// Grey button.
    Secondary,
    /// Green button.
    Success,
    /// Red button.
    Danger,
}

/// How a component is rendered on the persisted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Button label.
    pub label: String,
    /// Button style.
    #[serde(default)]
    pub style: ButtonStyle,
    /// Optional emoji shown before the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl ComponentDescriptor {
    /// Creates a button descriptor.
    #[must_use]
    pub fn button(label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            label: label.into(),
            style,
            emoji: None,
        }
    }

    /// Sets the emoji.
    #[must_use]
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// One interactive component of a panel.
#[derive(Clone)]
pub struct PanelComponent {
    custom_id: CustomId,
    descriptor: ComponentDescriptor,
    action: Arc<dyn ComponentAction>,
}

impl PanelComponent {
    /// Creates a panel component.
    #[must_use]
    pub fn new(
        custom_id: CustomId,
        descriptor: ComponentDescriptor,
        action: Arc<dyn ComponentAction>,
    ) -> Self {
        Self {
            custom_id,
            descriptor,
            action,
        }
    }

    /// Returns the custom identifier routing interactions to this component.
    #[must_use]
    pub const fn custom_id(&self) -> &CustomId {
        &self.custom_id
    }

    /// Returns the rendering descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    /// Returns the bound action.
    #[must_use]
    pub fn action(&self) -> Arc<dyn ComponentAction> {
        Arc::clone(&self.action)
    }
}

impl fmt::Debug for PanelComponent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PanelComponent")
            .field("custom_id", &self.custom_id)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Validated persistent panel.
///
/// The panel message is provisioned once, out of band. The bot never sends
/// it; it only resumes listening to its components.
#[derive(Debug, Clone)]
pub struct PanelSpec {
    implementation: String,
    target: PanelTarget,
    components: Vec<PanelComponent>,
}

impl PanelSpec {
    /// Creates a panel specification.
    #[must_use]
    pub fn new(
        implementation: impl Into<String>,
        target: PanelTarget,
        components: Vec<PanelComponent>,
    ) -> Self {
        Self {
            implementation: implementation.into(),
            target,
            components,
        }
    }

    /// Returns the implementation identifier.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Returns the persisted message location.
    #[must_use]
    pub const fn target(&self) -> PanelTarget {
        self.target
    }

    /// Returns the components in display order.
    #[must_use]
    pub fn components(&self) -> &[PanelComponent] {
        &self.components
    }

    /// Returns the custom identifiers of every component.
    pub fn custom_ids(&self) -> impl Iterator<Item = &CustomId> {
        self.components.iter().map(PanelComponent::custom_id)
    }
}
