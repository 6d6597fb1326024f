//! Error types and error code constants for angelsynth.
//!
//! The synthesis pass itself has no failure mode: unresolved lookups degrade
//! to "does not apply". Errors only surface at the outer layers (loading
//! configuration and script snapshots, CLI arguments).
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller, malformed config/snapshot)
//! - `3`: Resolution errors (type or file not found)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments or malformed input documents.
    InvalidArguments = 2,
    /// Resolution errors (type not found, file not found).
    ResolutionError = 3,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for angelsynth.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Script snapshot is malformed.
    #[error("snapshot error: {message}")]
    Snapshot { message: String },

    /// A requested type is not in the database.
    #[error("type not found: {name}")]
    TypeNotFound { name: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

pub type SynthResult<T> = Result<T, SynthError>;

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&SynthError> for OutputErrorCode {
    fn from(err: &SynthError) -> Self {
        match err {
            SynthError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            SynthError::Config(_) => OutputErrorCode::InvalidArguments,
            SynthError::Snapshot { .. } => OutputErrorCode::InvalidArguments,
            SynthError::Json(_) => OutputErrorCode::InvalidArguments,
            SynthError::TypeNotFound { .. } => OutputErrorCode::ResolutionError,
            SynthError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            SynthError::Io(_) => OutputErrorCode::InternalError,
            SynthError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<SynthError> for OutputErrorCode {
    fn from(err: SynthError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl SynthError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        SynthError::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn snapshot(message: impl Into<String>) -> Self {
        SynthError::Snapshot {
            message: message.into(),
        }
    }

    pub fn type_not_found(name: impl Into<String>) -> Self {
        SynthError::TypeNotFound { name: name.into() }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        SynthError::FileNotFound { path: path.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        SynthError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }

    /// Stable short name used in JSON error responses.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SynthError::InvalidArguments { .. } => "InvalidArguments",
            SynthError::Config(_) => "ConfigError",
            SynthError::Snapshot { .. } => "SnapshotError",
            SynthError::TypeNotFound { .. } => "TypeNotFound",
            SynthError::FileNotFound { .. } => "FileNotFound",
            SynthError::Io(_) => "IoError",
            SynthError::Json(_) => "JsonError",
            SynthError::InternalError { .. } => "InternalError",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
