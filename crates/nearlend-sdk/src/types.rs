//! Invocation request and result types

use std::fmt;

use nearlend_primitives::{AccountId, Balance};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::SdkError;

/// Classification of a failed invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The contract rejected execution (panic, failed precondition,
    /// unauthorized caller, unknown method, missing code)
    FunctionCallError,
    /// Network failure, timeout, or a response the harness could not read
    TransportError,
    /// Contract installation failed
    DeploymentError,
}

impl ErrorKind {
    /// Stable name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FunctionCallError => "FunctionCallError",
            ErrorKind::TransportError => "TransportError",
            ErrorKind::DeploymentError => "DeploymentError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote operation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read-only invocation
    View,
    /// State-mutating invocation
    Call,
    /// Contract installation
    Deploy,
}

/// Caller identity override for an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Account the invocation is attributed to
    pub account_id: AccountId,
}

impl CallContext {
    /// Create a context for the given caller
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }
}

/// A method invocation: name, JSON object arguments, optional caller
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    method: String,
    args: Map<String, Value>,
    context: Option<CallContext>,
}

impl InvocationRequest {
    /// Create a request with empty arguments
    pub fn new(method: impl Into<String>) -> Result<Self, SdkError> {
        let method = method.into();
        if method.trim().is_empty() {
            return Err(SdkError::InvalidArgs("method name is empty".to_string()));
        }
        Ok(Self {
            method,
            args: Map::new(),
            context: None,
        })
    }

    /// Replace the arguments. `null` means no arguments; anything other than
    /// a JSON object is rejected.
    pub fn with_args(mut self, args: Value) -> Result<Self, SdkError> {
        self.args = match args {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(SdkError::InvalidArgs(format!(
                    "arguments for {} must be a JSON object, got {}",
                    self.method,
                    json_type_name(&other)
                )))
            }
        };
        Ok(self)
    }

    /// Set a single argument
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Attribute the invocation to `account_id`
    pub fn with_caller(mut self, account_id: AccountId) -> Self {
        self.context = Some(CallContext::new(account_id));
        self
    }

    /// Method name
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Arguments
    pub fn args(&self) -> &Map<String, Value> {
        &self.args
    }

    /// Caller context override
    pub fn context(&self) -> Option<&CallContext> {
        self.context.as_ref()
    }
}

/// Outcome of a `view` or `call`
///
/// Serializes as `{"kind":"Success","value":...}` or
/// `{"kind":"Failure","type":"FunctionCallError","detail":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum InvocationResult {
    /// Remote execution succeeded
    Success {
        /// Decoded return value
        value: Value,
    },
    /// Remote execution or transport failed
    Failure {
        /// Failure classification
        #[serde(rename = "type")]
        error_kind: ErrorKind,
        /// Original diagnostic text
        detail: String,
    },
}

impl InvocationResult {
    /// Successful result
    pub fn success(value: Value) -> Self {
        InvocationResult::Success { value }
    }

    /// Failed result
    pub fn failure(error_kind: ErrorKind, detail: impl Into<String>) -> Self {
        InvocationResult::Failure {
            error_kind,
            detail: detail.into(),
        }
    }

    /// Whether the invocation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    /// Whether the invocation failed
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Failure classification, if failed
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            InvocationResult::Failure { error_kind, .. } => Some(*error_kind),
            InvocationResult::Success { .. } => None,
        }
    }

    /// Failure detail, if failed
    pub fn detail(&self) -> Option<&str> {
        match self {
            InvocationResult::Failure { detail, .. } => Some(detail),
            InvocationResult::Success { .. } => None,
        }
    }

    /// Success value, if succeeded
    pub fn value(&self) -> Option<&Value> {
        match self {
            InvocationResult::Success { value } => Some(value),
            InvocationResult::Failure { .. } => None,
        }
    }

    /// Deserialize the success value into `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, SdkError> {
        match self {
            InvocationResult::Success { value } => Ok(T::deserialize(value)?),
            InvocationResult::Failure { error_kind, detail } => Err(SdkError::Invocation {
                kind: *error_kind,
                detail: detail.clone(),
            }),
        }
    }

    /// Read the success value as a token amount
    ///
    /// Contracts return `u128` either as a JSON number or, for amounts beyond
    /// 2^53, as a decimal string.
    pub fn as_balance(&self) -> Result<Balance, SdkError> {
        let value = self.decode::<Value>()?;
        parse_balance(&value).ok_or_else(|| {
            SdkError::Serialization(format!("expected an unsigned amount, got {}", value))
        })
    }
}

/// Parse a JSON number or decimal string into a balance
pub(crate) fn parse_balance(value: &Value) -> Option<Balance> {
    match value {
        Value::Number(n) => n.as_u64().map(Balance::from),
        Value::String(s) => s.parse::<Balance>().ok(),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
