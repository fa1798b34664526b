//! # Error Types
//!
//! Recoverable errors of the core. Schema violations never reach runtime
//! (they fail to compile) and storage exhaustion aborts, so what remains is
//! configuration.

use thiserror::Error;

/// Errors that can occur while configuring the ECS.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeelError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

/// Result type for fallible core operations.
pub type KeelResult<T> = Result<T, KeelError>;
