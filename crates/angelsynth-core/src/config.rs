//! Configuration handling for angelsynth
//!
//! Two groups of settings drive synthesis:
//! - [`ScriptSettings`]: feature flags of the script environment
//! - [`CodeGenerationSettings`]: project-declared generator rules
//!
//! Generator rules use the camelCase keys of the project settings format
//! (`derivedFrom`, `staticFunctions`, `returnType`, ...).

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SynthError;

/// Directory holding per-project configuration.
pub const PROJECT_CONFIG_DIR: &str = ".angelsynth";

/// Configuration file name inside [`PROJECT_CONFIG_DIR`].
pub const PROJECT_CONFIG_FILE: &str = "config.toml";

/// angelsynth configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Script environment feature flags
    #[serde(default)]
    pub script: ScriptSettings,

    /// Project-specific generated code
    #[serde(default, alias = "codeGeneration")]
    pub code_generation: CodeGenerationSettings,
}

/// Script environment feature flags
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScriptSettings {
    /// `StaticClass()` is deprecated in this project
    #[serde(default, alias = "deprecateStaticClass")]
    pub deprecate_static_class: bool,

    /// `StaticClass()` is not allowed in this project
    #[serde(default, alias = "disallowStaticClass")]
    pub disallow_static_class: bool,

    /// Generate the extended (settings asset / effect handler) conventions
    #[serde(
        default,
        alias = "useAngelscriptHaze",
        alias = "use_angelscript_haze"
    )]
    pub extended_conventions: bool,
}

impl ScriptSettings {
    /// Whether the generic `StaticClass()` accessor should be generated.
    pub fn allows_static_class(&self) -> bool {
        !self.deprecate_static_class && !self.disallow_static_class
    }
}

/// Project generator rules
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CodeGenerationSettings {
    /// Apply the rules at all
    #[serde(default)]
    pub enable: bool,

    /// Rules in application order
    #[serde(default, deserialize_with = "lenient_list")]
    pub generators: Vec<GeneratorRule>,
}

/// A rule applied to every class deriving from `derived_from`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorRule {
    /// Ancestor class the rule is gated on
    #[serde(default)]
    pub derived_from: String,

    /// Free functions in the class's companion namespace
    #[serde(default, deserialize_with = "lenient_list")]
    pub static_functions: Vec<FunctionTemplate>,

    /// Methods on the class
    #[serde(default, deserialize_with = "lenient_list")]
    pub member_functions: Vec<FunctionTemplate>,

    /// Free functions generated once per matching property
    #[serde(default, deserialize_with = "lenient_list")]
    pub static_accessors: Vec<FunctionTemplate>,

    /// Methods generated once per matching property
    #[serde(default, deserialize_with = "lenient_list")]
    pub member_accessors: Vec<FunctionTemplate>,
}

/// Template for one generated function.
///
/// `name`, `returnType` and argument strings may contain `{class}`, and for
/// accessors also `{propType}` and `{propName}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionTemplate {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub return_type: String,

    #[serde(default, deserialize_with = "lenient_list")]
    pub args: Vec<ArgumentTemplate>,

    /// Const method (member templates only)
    #[serde(default, rename = "const")]
    pub is_const: bool,

    /// Accessed with property syntax (member templates only)
    #[serde(default)]
    pub property: bool,

    /// Accessors only: gate on the property's type deriving from this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
}

/// Template for one argument.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ArgumentTemplate {
    #[serde(default, rename = "type")]
    pub typename: String,

    #[serde(default)]
    pub name: String,
}

/// Accepts a list, or anything else as an empty list.
#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeList<T> {
    List(Vec<T>),
    Other(IgnoredAny),
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match MaybeList::deserialize(deserializer)? {
        MaybeList::List(items) => Ok(items),
        MaybeList::Other(_) => {
            tracing::warn!("ignoring malformed generator list in config");
            Ok(Vec::new())
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, SynthError> {
        toml::from_str(content)
            .map_err(|e| SynthError::Config(format!("failed to parse config file: {}", e)))
    }

    /// Parse configuration from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, SynthError> {
        serde_json::from_str(content)
            .map_err(|e| SynthError::Config(format!("failed to parse config file: {}", e)))
    }

    /// Load configuration from a file (`.json` is JSON, anything else TOML)
    pub fn load(path: &Path) -> Result<Self, SynthError> {
        let content = fs::read_to_string(path)
            .map_err(|e| SynthError::Config(format!("failed to read config file: {}", e)))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Load configuration from .angelsynth/config.toml in the given project root
    pub fn load_from_project(project_root: &Path) -> Result<Self, SynthError> {
        let config_path = project_root
            .join(PROJECT_CONFIG_DIR)
            .join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }
}
