//! Core infrastructure for angelsynth.
//!
//! This crate provides the collaborators the synthesis pass works against:
//! - Type database with classes, namespaces, modules and member symbols
//! - Host framework type seeding
//! - Configuration (script settings and project generator rules)
//! - Error types and error codes
//! - JSON output types for CLI responses
//! - Script snapshot loading (parsed script data as JSON)

pub mod config;
pub mod db;
pub mod error;
pub mod output;
pub mod snapshot;
