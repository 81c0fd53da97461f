//! SDK error types

use std::path::PathBuf;

use nearlend_primitives::AccountIdError;
use thiserror::Error;

use crate::types::ErrorKind;

/// Errors raised synchronously by the harness
///
/// Remote invocation failures are not represented here: `view` and `call`
/// return them as [`InvocationResult::Failure`](crate::InvocationResult)
/// values. The exception is [`SdkError::Invocation`], produced only when a
/// caller explicitly unwraps a failed result with `decode`.
#[derive(Debug, Error)]
pub enum SdkError {
    /// No account record with the given name
    #[error("Account record not found: {0}")]
    NotFound(String),

    /// Empty or malformed account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Account store could not be read
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Contract installation failed
    #[error("Deployment error: {0}")]
    Deployment(String),

    /// Invalid method name or argument payload
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// A failed invocation result was unwrapped
    #[error("{kind}: {detail}")]
    Invocation {
        /// Failure classification
        kind: ErrorKind,
        /// Remote diagnostic text
        detail: String,
    },
}

impl SdkError {
    /// Name of this error in the harness error taxonomy
    pub fn taxonomy(&self) -> &'static str {
        match self {
            SdkError::NotFound(_) => "NotFoundError",
            SdkError::InvalidAddress(_) => "InvalidAddressError",
            SdkError::Io { .. } => "IOError",
            SdkError::Transport(_) => ErrorKind::TransportError.as_str(),
            SdkError::Deployment(_) => ErrorKind::DeploymentError.as_str(),
            SdkError::InvalidArgs(_) => "InvalidArgumentsError",
            SdkError::Serialization(_) => "SerializationError",
            SdkError::Config(_) => "ConfigError",
            SdkError::Invocation { kind, .. } => kind.as_str(),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<AccountIdError> for SdkError {
    fn from(e: AccountIdError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(e: toml::de::Error) -> Self {
        SdkError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_names() {
        assert_eq!(SdkError::NotFound("x".into()).taxonomy(), "NotFoundError");
        assert_eq!(
            SdkError::InvalidAddress("x".into()).taxonomy(),
            "InvalidAddressError"
        );
        assert_eq!(SdkError::Transport("x".into()).taxonomy(), "TransportError");
        assert_eq!(SdkError::Deployment("x".into()).taxonomy(), "DeploymentError");
        let invocation = SdkError::Invocation {
            kind: ErrorKind::FunctionCallError,
            detail: "panicked".into(),
        };
        assert_eq!(invocation.taxonomy(), "FunctionCallError");
        assert_eq!(invocation.to_string(), "FunctionCallError: panicked");
    }

    #[test]
    fn test_io_error_display() {
        let err = SdkError::Io {
            path: PathBuf::from("/accounts/root"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/accounts/root"));
        assert_eq!(err.taxonomy(), "IOError");
    }

    #[test]
    fn test_from_account_id_error() {
        let err: SdkError = AccountIdError::Empty.into();
        assert!(matches!(err, SdkError::InvalidAddress(_)));
    }
}
