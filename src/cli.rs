//! CLI front door.
//!
//! Provides the helpers behind the `angelsynth` binary:
//! - `synthesize` - load a script snapshot, run synthesis, render the result
//! - `show-config` - render the effective configuration
//!
//! All functions return `Result<T, SynthError>` so the binary can map
//! failures onto stable exit codes.

use std::path::Path;

use serde::Serialize;

use angelsynth_core::config::Config;
use angelsynth_core::db::TypeId;
use angelsynth_core::error::{SynthError, SynthResult};
use angelsynth_core::output::{SynthesisResponse, TypeOutput, SCHEMA_VERSION};
use angelsynth_core::snapshot::ScriptSnapshot;

use crate::synth::synthesize_module;

/// Response for `show-config`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub status: String,
    pub schema_version: String,
    pub config: Config,
}

impl ConfigResponse {
    pub fn new(config: Config) -> Self {
        ConfigResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            config,
        }
    }
}

/// Resolve the configuration: an explicit file, else the project's
/// `.angelsynth/config.toml`, else defaults.
pub fn load_config(explicit: Option<&Path>, project_root: &Path) -> SynthResult<Config> {
    match explicit {
        Some(path) if !path.exists() => Err(SynthError::file_not_found(path.display().to_string())),
        Some(path) => Config::load(path),
        None => Config::load_from_project(project_root),
    }
}

/// Synthesize every script type in a snapshot.
///
/// With `type_filter`, only types whose simple or qualified name matches are
/// rendered; a filter that is blank or matches nothing is an error.
pub fn synthesize_snapshot(
    snapshot: ScriptSnapshot,
    config: &Config,
    type_filter: Option<&str>,
) -> SynthResult<SynthesisResponse> {
    if type_filter.is_some_and(|name| name.trim().is_empty()) {
        return Err(SynthError::invalid_args("--type needs a type name"));
    }

    let (mut db, modules) = snapshot.into_database()?;

    let mut rendered: Vec<(TypeId, Vec<String>)> = Vec::new();
    for module_id in modules {
        for summary in synthesize_module(&mut db, module_id, config) {
            rendered.push((summary.type_id, summary.generator_names()));
        }
    }

    let mut types = Vec::new();
    for (type_id, generators) in rendered {
        let Some(output) = TypeOutput::from_db(&db, type_id, generators) else {
            return Err(SynthError::internal(format!("{} vanished during synthesis", type_id)));
        };
        let keep = match type_filter {
            Some(name) => output.name == name || output.qualified_name == name,
            None => true,
        };
        if keep {
            types.push(output);
        }
    }

    if let Some(name) = type_filter {
        if types.is_empty() {
            return Err(SynthError::type_not_found(name));
        }
    }

    tracing::info!(types = types.len(), "synthesis complete");
    Ok(SynthesisResponse::new(types))
}

/// Run `synthesize` on a snapshot file and return the JSON response.
pub fn run_synthesize(
    snapshot_path: &Path,
    config: &Config,
    type_filter: Option<&str>,
) -> SynthResult<String> {
    let snapshot = ScriptSnapshot::load(snapshot_path)?;
    let response = synthesize_snapshot(snapshot, config, type_filter)?;
    serde_json::to_string_pretty(&response)
        .map_err(|e| SynthError::internal(format!("JSON serialization error: {}", e)))
}

/// Render the effective configuration as JSON.
pub fn run_show_config(config: &Config) -> SynthResult<String> {
    serde_json::to_string_pretty(&ConfigResponse::new(config.clone()))
        .map_err(|e| SynthError::internal(format!("JSON serialization error: {}", e)))
}
