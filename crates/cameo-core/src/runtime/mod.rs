// crates/cameo-core/src/runtime/mod.rs
// ============================================================================
// Module: CAMEO Runtime
// Description: Composition, validation, edition publishing, and auditing.
// Purpose: Turn validated tables into codes for callers.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime holds the code composer, the well-formedness check for code
//! text, the registry that publishes table editions, and the audit plumbing.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod composer;
pub mod registry;
pub mod service;
pub mod validate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditOutcome;
pub use audit::AuditSink;
pub use audit::ComposeAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::TablesPublishedEvent;
pub use composer::CodeComposer;
pub use composer::ComposeError;
pub use composer::ComposedCode;
pub use composer::ComposerOptions;
pub use composer::Provenance;
pub use composer::TiePolicy;
pub use registry::RegistryError;
pub use registry::TableRegistry;
pub use service::AuditedComposer;
pub use validate::validate;
pub use validate::validate_with;
