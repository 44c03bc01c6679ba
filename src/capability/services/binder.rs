//! Binding of event handlers to host hooks.

use crate::capability::domain::{EventBinding, HostHook};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Hook-to-handler table. Holds at most one binding per hook.
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    bindings: HashMap<HostHook, EventBinding>,
}

impl HookTable {
    /// Returns the binding for `hook`, if any.
    #[must_use]
    pub fn get(&self, hook: HostHook) -> Option<&EventBinding> {
        self.bindings.get(&hook)
    }

    /// Returns the number of bound hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns whether no hook is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the bound hooks.
    pub fn hooks(&self) -> impl Iterator<Item = HostHook> + '_ {
        self.bindings.keys().copied()
    }
}

/// Registers event bindings on their hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventDispatchBinder;

impl EventDispatchBinder {
    /// Creates a binder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Binds every handler to its hook.
    ///
    /// A later binding for the same hook replaces the earlier one.
    #[must_use]
    pub fn bind(&self, bindings: Vec<EventBinding>) -> HookTable {
        let mut table = HookTable::default();
        for binding in bindings {
            let hook = binding.hook();
            let implementation = binding.implementation().to_owned();
            if let Some(replaced) = table.bindings.insert(hook, binding) {
                warn!(
                    hook = %hook,
                    replaced = replaced.implementation(),
                    implementation = %implementation,
                    "hook already bound; the later handler replaces the earlier one"
                );
            } else {
                debug!(hook = %hook, implementation = %implementation, "event handler bound");
            }
        }
        table
    }
}
