//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration and profile operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Bad scope token or scope/file combination.
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// Named config file missing on an explicit read.
    #[error("configuration file not found: {path}")]
    NotFound { path: String },

    /// A document on disk exists but is not valid JSON.
    #[error("invalid JSON in configuration file '{path}': {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },

    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write a config file.
    #[error("failed to write config file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize a document.
    #[error("failed to serialize configuration: {0}")]
    Serialize(serde_json::Error),

    /// A profile with this name already exists in its type.
    #[error("profile '{name}' already exists in '{profile_type}'")]
    DuplicateProfile { profile_type: String, name: String },

    /// Profile not found in its type.
    #[error("profile '{name}' not found in '{profile_type}'")]
    ProfileNotFound { profile_type: String, name: String },

    /// One or more field-rule violations, or malformed caller-supplied JSON.
    ///
    /// All violations for a single call are collected before failing.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
