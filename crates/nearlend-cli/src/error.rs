//! CLI error types

use nearlend_sdk::{ErrorKind, SdkError};
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Harness error
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// The remote side rejected the invocation or could not be reached
    #[error("{kind}: {detail}")]
    Invocation {
        /// Failure classification
        kind: ErrorKind,
        /// Original diagnostic text
        detail: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    /// Error taxonomy name for reporting
    pub fn taxonomy(&self) -> &'static str {
        match self {
            CliError::Sdk(e) => e.taxonomy(),
            CliError::Invocation { kind, .. } => kind.as_str(),
            CliError::InvalidInput(_) => "InvalidArgumentsError",
            CliError::Io(_) => "IOError",
            CliError::Json(_) => "SerializationError",
            CliError::Config(_) => "ConfigError",
        }
    }
}
