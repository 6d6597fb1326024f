//! angelsynth: synthetic symbol generation for Angelscript classes.
//!
//! Script classes implicitly gain members and free functions from the host
//! framework's conventions (components get `Get`/`Create`, delegates get
//! bind and execute members, ...) and from project-declared rules. None of
//! these appear in the script text, so the analyzer synthesizes them into
//! its type database where completion, hover and signature help can see
//! them.

// Core infrastructure - re-exported from angelsynth-core
pub use angelsynth_core::config;
pub use angelsynth_core::db;
pub use angelsynth_core::error;
pub use angelsynth_core::output;
pub use angelsynth_core::snapshot;

// The synthesis pass
pub mod synth;

// Front door for the command line
pub mod cli;
