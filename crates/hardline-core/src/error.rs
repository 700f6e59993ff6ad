//! Error types for the Hardline engine

use thiserror::Error;

/// Result type alias using the Hardline Error
pub type Result<T> = std::result::Result<T, Error>;

/// Hardline error types
#[derive(Error, Debug)]
pub enum Error {
    // === Policy Errors ===
    #[error("Policy load failed ({stage}): {message}")]
    PolicyLoad { stage: &'static str, message: String },

    // === Scheduler Errors ===
    #[error("Circular dependency detected: scheduled {processed} out of {total} rules")]
    CyclicDependency { processed: usize, total: usize },

    // === Platform Adapter Errors ===
    #[error("Adapter failure: {0}")]
    Adapter(String),

    #[error("Unsupported registry root key: {0}")]
    UnsupportedRootKey(String),

    #[error("Invalid octal mode: {0}")]
    InvalidMode(String),

    #[error("Invalid pattern: {0}")]
    Regex(String),

    // === Remediation Errors ===
    #[error("Unknown action type")]
    UnknownActionType,

    #[error("Manual action required")]
    ManualActionRequired,

    // === Journal Errors ===
    #[error("Journal error: {0}")]
    Journal(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === IO / Serialization ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get an error code for logging/metrics
    pub fn code(&self) -> &'static str {
        match self {
            Error::PolicyLoad { .. } => "POLICY_LOAD",
            Error::CyclicDependency { .. } => "CYCLIC_DEPENDENCY",
            Error::Adapter(_) => "ADAPTER_FAILURE",
            Error::UnsupportedRootKey(_) => "UNSUPPORTED_ROOT_KEY",
            Error::InvalidMode(_) => "INVALID_MODE",
            Error::Regex(_) => "INVALID_PATTERN",
            Error::UnknownActionType => "UNKNOWN_ACTION_TYPE",
            Error::ManualActionRequired => "MANUAL_ACTION_REQUIRED",
            Error::Journal(_) => "JOURNAL_ERROR",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Other(_) => "OTHER",
        }
    }

    /// Check if this error aborts an entire scan (vs. a single rule)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::CyclicDependency { .. } | Error::PolicyLoad { .. } | Error::Configuration(_)
        )
    }
}
