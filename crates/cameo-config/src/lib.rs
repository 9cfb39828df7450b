// crates/cameo-config/src/lib.rs
// ============================================================================
// Module: CAMEO Config Library
// Description: Configuration and table-source loading for the code composer.
// Purpose: Turn `cameo.toml` and authored table files into a validated edition.
// Dependencies: crate::{config, loader, rows}
// ============================================================================

//! ## Overview
//! `cameo-config` reads the composer configuration, loads TOML table files
//! and tab-separated reference listings, and hands back a validated
//! [`cameo_core::TableSet`] ready to publish.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod loader;
pub mod rows;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuditConfig;
pub use config::AuditSinkKind;
pub use config::CameoConfig;
pub use config::ComposerConfig;
pub use config::ConfigError;
pub use config::ReferenceRowsSource;
pub use config::TablesConfig;
pub use loader::DEFAULT_MAX_TABLE_BYTES;
pub use loader::LoadError;
pub use loader::TableLoader;
pub use rows::parse_reference_rows;
