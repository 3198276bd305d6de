//! Core error types for rooti-core.
//!
//! Validation failures are surfaced synchronously to the caller; illegal
//! operations (editing while running, out-of-range removal, pausing an idle
//! timer) are mostly silent no-ops and only show up here where a caller
//! asked for a result.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rooti-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Segment input was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The routine cannot be edited while the timer is running
    #[error("Routine cannot be edited while the timer is running")]
    EditingLocked,
}

/// Rejected segment input. No state is mutated when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("minutes must be a positive integer, got {0}")]
    NonPositiveMinutes(i64),

    #[error("minutes must be a number, got '{0}'")]
    NotANumber(String),

    #[error("minutes value {0} is too large")]
    MinutesTooLarge(i64),

    #[error("unknown segment kind '{0}' (expected study or break)")]
    UnknownSegmentKind(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("could not determine the home directory")]
    NoHomeDir,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
