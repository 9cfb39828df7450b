// crates/cameo-core/src/runtime/service.rs
// ============================================================================
// Module: Audited Composer
// Description: Registry-backed composition with one audit event per call.
// Purpose: Serve compositions from the current edition and record each outcome.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! [`AuditedComposer`] is the front door for long-running callers: it takes a
//! snapshot of the registry's current edition, composes against it, and hands
//! the outcome to an [`AuditSink`]. Publishing through the composer records a
//! [`TablesPublishedEvent`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::date::CodingDate;
use crate::core::descriptor::EntityDescriptor;
use crate::core::tables::TableSet;
use crate::runtime::audit::AuditSink;
use crate::runtime::audit::ComposeAuditEvent;
use crate::runtime::audit::TablesPublishedEvent;
use crate::runtime::composer::CodeComposer;
use crate::runtime::composer::ComposeError;
use crate::runtime::composer::ComposedCode;
use crate::runtime::composer::ComposerOptions;
use crate::runtime::registry::RegistryError;
use crate::runtime::registry::TableRegistry;

// ============================================================================
// SECTION: Audited Composer
// ============================================================================

/// Composer over a table registry that audits every call.
pub struct AuditedComposer {
    /// Source of table editions.
    registry: Arc<TableRegistry>,
    /// Composer behavior switches.
    options: ComposerOptions,
    /// Audit destination.
    sink: Arc<dyn AuditSink>,
}

impl AuditedComposer {
    /// Creates an audited composer.
    #[must_use]
    pub fn new(
        registry: Arc<TableRegistry>,
        options: ComposerOptions,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            registry,
            options,
            sink,
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TableRegistry> {
        &self.registry
    }

    /// Composes against the current edition and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns the [`ComposeError`] produced by [`CodeComposer::compose`].
    pub fn compose(
        &self,
        descriptor: &EntityDescriptor,
        as_of: Option<CodingDate>,
    ) -> Result<ComposedCode, ComposeError> {
        let tables = self.registry.snapshot();
        let composer = CodeComposer::with_options(Arc::clone(&tables), self.options);
        let result = composer.compose(descriptor, as_of);
        let event = ComposeAuditEvent::new(descriptor, as_of, &result, tables.canonical_hash());
        self.sink.record_compose(&event);
        result
    }

    /// Publishes an appended edition and records the publish.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the edition is not append-only.
    pub fn publish(&self, next: TableSet) -> Result<(), RegistryError> {
        let digest = next.canonical_hash().clone();
        let stats = next.stats();
        let previous = self.registry.publish(next)?;
        self.sink.record_publish(&TablesPublishedEvent::new(
            digest,
            previous.canonical_hash().clone(),
            stats,
        ));
        Ok(())
    }
}
