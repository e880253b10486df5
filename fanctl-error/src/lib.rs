//! Unified error handling for fanctl
//!
//! This crate provides the single error type shared by the configuration core
//! and the command surface. It uses thiserror for Display and Error impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using FanctlError
pub type Result<T> = std::result::Result<T, FanctlError>;

/// Unified error type for all fanctl operations
#[derive(thiserror::Error, Debug)]
pub enum FanctlError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Schema Errors
    // ============================================================================
    /// The schema document itself is unusable (startup failure)
    #[error("Schema error: {0}")]
    Schema(String),

    /// A document does not conform to the schema
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    // ============================================================================
    // Configuration Errors (user facing)
    // ============================================================================
    #[error("Configuration parsing error: {0}")]
    ConfigurationParsing(String),

    #[error("Invalid strategy: {}", .name.as_deref().unwrap_or("<none>"))]
    InvalidStrategy {
        name: Option<String>,
    },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Generic(String),
}

impl FanctlError {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a configuration parsing error from a string
    pub fn config_parsing(msg: impl Into<String>) -> Self {
        Self::ConfigurationParsing(msg.into())
    }

    /// Create an invalid strategy error for a known name
    pub fn invalid_strategy(name: impl Into<String>) -> Self {
        Self::InvalidStrategy {
            name: Some(name.into()),
        }
    }

    /// Create a schema error from a string
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
