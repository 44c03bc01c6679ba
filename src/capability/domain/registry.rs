//! Explicit capability registration table.

use super::{CapabilityDraft, CapabilityKind};
use crate::interaction::BotContext;
use std::fmt;
use std::sync::Arc;

/// Builds a capability draft from the shared context.
pub type CapabilityBuilder = Arc<dyn Fn(&BotContext) -> CapabilityDraft + Send + Sync>;

/// Contract implemented by stateless capability types.
///
/// Implementations that capture state (a shared roster, a timer table) are
/// registered through [`CapabilityEntry::with_builder`] instead.
pub trait Capability {
    /// Stable implementation identifier; the default externally visible name.
    const IDENTIFIER: &'static str;

    /// Documentation text; its first paragraph is the default description.
    const DOCUMENTATION: &'static str;

    /// Kind the implementation registers as.
    const KIND: CapabilityKind;

    /// Builds the draft from the shared context.
    fn build(context: &BotContext) -> CapabilityDraft;
}

/// One registration: identifier, documentation, kind, and builder.
#[derive(Clone)]
pub struct CapabilityEntry {
    identifier: String,
    documentation: String,
    kind: CapabilityKind,
    builder: CapabilityBuilder,
}

impl CapabilityEntry {
    /// Registers a [`Capability`] type.
    #[must_use]
    pub fn of<C: Capability + 'static>() -> Self {
        Self {
            identifier: C::IDENTIFIER.to_owned(),
            documentation: C::DOCUMENTATION.to_owned(),
            kind: C::KIND,
            builder: Arc::new(C::build),
        }
    }

    /// Registers an implementation built by a closure.
    #[must_use]
    pub fn with_builder<F>(
        identifier: impl Into<String>,
        documentation: impl Into<String>,
        kind: CapabilityKind,
        builder: F,
    ) -> Self
    where
        F: Fn(&BotContext) -> CapabilityDraft + Send + Sync + 'static,
    {
        Self {
            identifier: identifier.into(),
            documentation: documentation.into(),
            kind,
            builder: Arc::new(builder),
        }
    }

    /// Returns the implementation identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the documentation text.
    #[must_use]
    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// Returns the registered kind.
    #[must_use]
    pub const fn kind(&self) -> CapabilityKind {
        self.kind
    }

    /// Runs the builder.
    #[must_use]
    pub fn build(&self, context: &BotContext) -> CapabilityDraft {
        (self.builder)(context)
    }
}

impl fmt::Debug for CapabilityEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CapabilityEntry")
            .field("identifier", &self.identifier)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Ordered, statically declared set of capability registrations.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    entries: Vec<CapabilityEntry>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a registration.
    #[must_use]
    pub fn with(mut self, entry: CapabilityEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Appends a registration in place.
    pub fn register(&mut self, entry: CapabilityEntry) {
        self.entries.push(entry);
    }

    /// Returns the registrations in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[CapabilityEntry] {
        &self.entries
    }

    /// Returns the registrations of one kind.
    pub fn of_kind(&self, kind: CapabilityKind) -> impl Iterator<Item = &CapabilityEntry> {
        self.entries.iter().filter(move |entry| entry.kind() == kind)
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
