// crates/cameo-core/src/runtime/registry.rs
// ============================================================================
// Module: Table Registry
// Description: Load-then-publish holder for the current table edition.
// Purpose: Swap table editions atomically while compositions are in flight.
// Dependencies: arc-swap, crate::core, thiserror
// ============================================================================

//! ## Overview
//! [`TableRegistry`] owns the current [`TableSet`] behind an `ArcSwap`.
//! Readers take an `Arc` snapshot per call and keep using it even if a new
//! edition is published mid-call; they never observe a partially loaded
//! table set because editions are validated before they are published.
//! Publishers are serialized so the append-only check always compares
//! against the edition actually being replaced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::core::tables::EditionError;
use crate::core::tables::TableSet;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Publish failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// New edition rewrites or removes published records.
    #[error("edition rejected: {0}")]
    Edition(#[from] EditionError),
    /// Publisher lock was poisoned by a panicking publisher.
    #[error("registry publish lock poisoned")]
    Poisoned,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Holder of the current table edition.
pub struct TableRegistry {
    /// Current edition.
    current: ArcSwap<TableSet>,
    /// Serializes publishers.
    publish_lock: Mutex<()>,
}

impl TableRegistry {
    /// Creates a registry serving `initial`.
    #[must_use]
    pub fn new(initial: TableSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            publish_lock: Mutex::new(()),
        }
    }

    /// Returns the current edition.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TableSet> {
        self.current.load_full()
    }

    /// Publishes `next` unconditionally and returns the replaced edition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Poisoned`] when the publisher lock is poisoned.
    pub fn replace(&self, next: TableSet) -> Result<Arc<TableSet>, RegistryError> {
        let _guard = self.publish_lock.lock().map_err(|_| RegistryError::Poisoned)?;
        Ok(self.current.swap(Arc::new(next)))
    }

    /// Publishes `next` only if it appends to the current edition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Edition`] when `next` changes or drops records
    /// of the current edition; the current edition stays in place.
    pub fn publish(&self, next: TableSet) -> Result<Arc<TableSet>, RegistryError> {
        let _guard = self.publish_lock.lock().map_err(|_| RegistryError::Poisoned)?;
        let current = self.current.load_full();
        next.verify_append_only(&current)?;
        self.current.store(Arc::new(next));
        Ok(current)
    }
}
