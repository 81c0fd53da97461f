//! Result/error classification
//!
//! Turns whatever the transport produced into exactly one
//! [`InvocationResult`]. The remote API reports failures in three shapes:
//!
//! - an error descriptor tagged with `type`, as the REST server forwards
//!   `TypedError`s: `{"type":"FunctionCallError","kind":{...}}`
//! - a view failure carrying the node's error text: `{"error":"wasm execution
//!   failed with error: FunctionCallError(...)"}`
//! - a transaction outcome: `{"status":{"Failure":{...}}}`
//!
//! Anything that is not recognisably a success is a failure; a response the
//! classifier cannot read is a `TransportError`, never a `Success`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::transport::RawResponse;
use crate::types::{ErrorKind, InvocationResult, Operation};
use crate::SdkError;

/// `type` tags raised while the contract method was executing
const EXECUTION_ERROR_TYPES: &[&str] = &[
    "FunctionCallError",
    "ExecutionError",
    "GuestPanic",
    "HostError",
    "MethodResolveError",
    "CompilationError",
    "WasmTrap",
    "ActionError",
    "LinkError",
];

/// Substrings of node error text that point at contract execution
const EXECUTION_MARKERS: &[&str] = &[
    "FunctionCallError",
    "ExecutionError",
    "ActionError",
    "panicked",
    "GuestPanic",
    "HostError",
    "MethodResolveError",
    "MethodNotFound",
    "CodeDoesNotExist",
    "CompilationError",
    "WasmTrap",
    "ProhibitedInView",
];

/// Classify a raw transport result
pub fn classify(operation: Operation, raw: Result<RawResponse, SdkError>) -> InvocationResult {
    let response = match raw {
        Ok(response) => response,
        Err(e) => return InvocationResult::failure(ErrorKind::TransportError, e.to_string()),
    };

    if let Some(failure) = classify_error_descriptor(operation, &response) {
        return failure;
    }

    if let Some(failure) = classify_error_field(operation, &response) {
        return failure;
    }

    if operation != Operation::View {
        if let Some(outcome) = classify_outcome(operation, &response.body) {
            return outcome;
        }
    }

    if !response.is_success() {
        return InvocationResult::failure(
            ErrorKind::TransportError,
            format!("HTTP {}: {}", response.status, render(&response.body)),
        );
    }

    InvocationResult::success(response.body)
}

/// Kind assigned to a failure that happened inside contract execution
fn execution_kind(operation: Operation) -> ErrorKind {
    match operation {
        Operation::Deploy => ErrorKind::DeploymentError,
        Operation::View | Operation::Call => ErrorKind::FunctionCallError,
    }
}

/// `{"type": "...", ...}` bodies
fn classify_error_descriptor(operation: Operation, response: &RawResponse) -> Option<InvocationResult> {
    let object = response.body.as_object()?;
    let tag = object.get("type")?.as_str()?;

    let known = EXECUTION_ERROR_TYPES.contains(&tag) || tag == ErrorKind::DeploymentError.as_str();
    // A successful view may legitimately return a struct with a `type` field
    if response.is_success() && !known && !tag.ends_with("Error") {
        return None;
    }

    let kind = if EXECUTION_ERROR_TYPES.contains(&tag) {
        execution_kind(operation)
    } else if tag == ErrorKind::DeploymentError.as_str() {
        ErrorKind::DeploymentError
    } else {
        ErrorKind::TransportError
    };

    let detail = match (object.get("message"), object.get("kind")) {
        (Some(Value::String(message)), _) => message.clone(),
        (_, Some(kind)) => format!("{}: {}", tag, render(kind)),
        _ => render(&response.body),
    };

    Some(InvocationResult::failure(kind, detail))
}

/// `{"error": ...}` bodies
fn classify_error_field(operation: Operation, response: &RawResponse) -> Option<InvocationResult> {
    let object = response.body.as_object()?;
    let error = object.get("error")?;
    let text = match error {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        Value::Object(fields) => match fields.get("message") {
            Some(Value::String(message)) => {
                let data = fields.get("data").map(render).unwrap_or_default();
                let cause = fields.get("cause").map(render).unwrap_or_default();
                [message.as_str(), data.as_str(), cause.as_str()]
                    .iter()
                    .filter(|s| !s.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(": ")
            }
            _ => render(error),
        },
        other => render(other),
    };

    let execution = mentions_execution(&text);
    // A successful view may return a struct with an `error` field; only the
    // node's view-failure shape (`error` with `logs`) or execution text fails
    if response.is_success() && !execution && !object.contains_key("logs") {
        return None;
    }

    let kind = if execution {
        execution_kind(operation)
    } else {
        ErrorKind::TransportError
    };
    Some(InvocationResult::failure(kind, text))
}

/// `{"status": {"SuccessValue" | "SuccessReceiptId" | "Failure": ...}}` bodies
fn classify_outcome(operation: Operation, body: &Value) -> Option<InvocationResult> {
    let status = body.as_object()?.get("status")?.as_object()?;

    if let Some(failure) = status.get("Failure") {
        let detail = render(failure);
        let kind = if mentions_execution(&detail) {
            execution_kind(operation)
        } else {
            // InvalidTxError and friends: rejected before any code ran
            ErrorKind::TransportError
        };
        return Some(InvocationResult::failure(kind, detail));
    }

    if let Some(encoded) = status.get("SuccessValue") {
        let encoded = match encoded.as_str() {
            Some(s) => s,
            None => {
                return Some(InvocationResult::failure(
                    ErrorKind::TransportError,
                    format!("malformed SuccessValue: {}", encoded),
                ))
            }
        };
        return Some(match STANDARD.decode(encoded) {
            Ok(bytes) => InvocationResult::success(decode_return_value(&bytes)),
            Err(e) => InvocationResult::failure(
                ErrorKind::TransportError,
                format!("malformed SuccessValue {:?}: {}", encoded, e),
            ),
        });
    }

    if let Some(receipt) = status.get("SuccessReceiptId") {
        return Some(InvocationResult::success(receipt.clone()));
    }

    None
}

/// Decode the raw bytes a contract method returned
fn decode_return_value(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn mentions_execution(text: &str) -> bool {
    EXECUTION_MARKERS.iter().any(|marker| text.contains(marker))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
