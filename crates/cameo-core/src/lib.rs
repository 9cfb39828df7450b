// crates/cameo-core/src/lib.rs
// ============================================================================
// Module: CAMEO Core Library
// Description: Public API surface for the CAMEO code composer.
// Purpose: Expose core types, table interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! CAMEO core composes hierarchical event-data codes for actors, religions,
//! and ethnic groups. Curated reference entries override everything; other
//! entities are coded by walking tiered rule tables one segment at a time.
//! Tables are validated once, published as immutable editions, and read
//! concurrently without locks.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::CodeTables;
pub use runtime::AuditOutcome;
pub use runtime::AuditSink;
pub use runtime::AuditedComposer;
pub use runtime::CodeComposer;
pub use runtime::ComposeAuditEvent;
pub use runtime::ComposeError;
pub use runtime::ComposedCode;
pub use runtime::ComposerOptions;
pub use runtime::FileAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::Provenance;
pub use runtime::RegistryError;
pub use runtime::StderrAuditSink;
pub use runtime::TablesPublishedEvent;
pub use runtime::TableRegistry;
pub use runtime::TiePolicy;
pub use runtime::validate;
pub use runtime::validate_with;
