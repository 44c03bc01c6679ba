//! Re-association of persistent panels with their existing messages.

use crate::capability::domain::{ConfigurationError, PanelComponent, PanelSpec};
use crate::capability::ports::{ChatHost, ChatHostResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Component bound to a custom identifier, with the panel that owns it.
#[derive(Debug, Clone)]
pub struct PanelRoute {
    implementation: String,
    component: PanelComponent,
}

impl PanelRoute {
    /// Returns the owning panel's implementation identifier.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Returns the routed component.
    #[must_use]
    pub const fn component(&self) -> &PanelComponent {
        &self.component
    }
}

/// Custom identifier routing table for every panel component.
#[derive(Debug, Clone, Default)]
pub struct PanelRoutes {
    routes: HashMap<String, PanelRoute>,
}

impl PanelRoutes {
    /// Builds the routing table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateCustomId`] when two components,
    /// in the same panel or in different panels, share a custom identifier.
    pub fn build(panels: &[PanelSpec]) -> Result<Self, ConfigurationError> {
        let mut routes: HashMap<String, PanelRoute> = HashMap::new();
        for panel in panels {
            for component in panel.components() {
                let key = component.custom_id().as_str();
                if let Some(existing) = routes.get(key) {
                    return Err(ConfigurationError::DuplicateCustomId {
                        implementation: panel.implementation().to_owned(),
                        custom_id: key.to_owned(),
                        existing: existing.implementation.clone(),
                    });
                }
                routes.insert(
                    key.to_owned(),
                    PanelRoute {
                        implementation: panel.implementation().to_owned(),
                        component: component.clone(),
                    },
                );
            }
        }
        Ok(Self { routes })
    }

    /// Returns the route for a custom identifier.
    #[must_use]
    pub fn get(&self, custom_id: &str) -> Option<&PanelRoute> {
        self.routes.get(custom_id)
    }

    /// Returns the number of routed components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether no component is routed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Asks the host to resume listening to every panel's components.
#[derive(Clone)]
pub struct PersistentPanelReattacher<H>
where
    H: ChatHost + ?Sized,
{
    host: Arc<H>,
}

impl<H> PersistentPanelReattacher<H>
where
    H: ChatHost + ?Sized,
{
    /// Creates a reattacher.
    #[must_use]
    pub const fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    /// Attaches every panel to its previously sent message, in order.
    ///
    /// The panel message itself is never sent or modified.
    ///
    /// # Errors
    ///
    /// Returns the first host failure; remaining panels are not attached.
    pub async fn reattach(&self, panels: &[PanelSpec]) -> ChatHostResult<()> {
        for panel in panels {
            self.host.attach_panel(panel).await?;
            info!(
                panel = panel.implementation(),
                channel = %panel.target().channel,
                message = %panel.target().message,
                components = panel.components().len(),
                "persistent panel re-attached"
            );
        }
        Ok(())
    }
}
