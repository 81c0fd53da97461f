//! In-memory contract runtime for tests
//!
//! [`Sandbox`] answers the REST API endpoints the way the remote node does,
//! for a generic "field store" contract installed on any account:
//!
//! - `get_<field>` returns the field (0 when never set)
//! - `set_<field>` `{amount}` is private (only the contract itself may call
//!   it) and takes an unsigned 128-bit amount
//!
//! Failures come back in the same shapes the real API uses, so they go
//! through the normal classifier. Every request is recorded, and faults can
//! be queued to simulate a dead or misbehaving server.

use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use nearlend_primitives::{AccountId, Balance, CodeHash};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

use crate::transport::{Endpoint, RawResponse, Transport};
use crate::types::parse_balance;
use crate::SdkError;

/// A request received by the sandbox
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Endpoint hit
    pub endpoint: Endpoint,
    /// Request body
    pub body: Value,
}

/// Injected misbehaviour for the next request
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// The request never gets an answer
    Timeout,
    /// Answer with this response instead of executing the request
    Respond(RawResponse),
}

#[derive(Debug, Default)]
struct SandboxAccount {
    code: Option<CodeHash>,
    fields: BTreeMap<String, Balance>,
}

#[derive(Debug, Default)]
struct SandboxState {
    accounts: HashMap<String, SandboxAccount>,
    requests: Vec<RecordedRequest>,
    faults: VecDeque<Fault>,
}

/// In-memory contract runtime implementing [`Transport`]
#[derive(Debug, Default)]
pub struct Sandbox {
    state: Mutex<SandboxState>,
}

impl Sandbox {
    /// Create an empty sandbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Install code on an account (state is kept across reinstalls)
    pub fn install(&self, account: &AccountId, code: &[u8]) {
        let mut state = self.state.lock();
        state
            .accounts
            .entry(account.to_string())
            .or_default()
            .code = Some(CodeHash::of_code(code));
    }

    /// Set a contract field directly
    pub fn set_field(&self, account: &AccountId, field: &str, value: Balance) {
        let mut state = self.state.lock();
        state
            .accounts
            .entry(account.to_string())
            .or_default()
            .fields
            .insert(field.to_string(), value);
    }

    /// Read a contract field directly
    pub fn field(&self, account: &AccountId, field: &str) -> Option<Balance> {
        let state = self.state.lock();
        state
            .accounts
            .get(account.as_str())
            .and_then(|a| a.fields.get(field).copied())
    }

    /// Hash of the code installed on an account
    pub fn code_hash(&self, account: &AccountId) -> Option<CodeHash> {
        let state = self.state.lock();
        state.accounts.get(account.as_str()).and_then(|a| a.code)
    }

    /// Queue a fault for the next request
    pub fn inject_fault(&self, fault: Fault) {
        self.state.lock().faults.push_back(fault);
    }

    /// All requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Number of requests received on `endpoint`
    pub fn request_count(&self, endpoint: Endpoint) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .count()
    }

    fn handle(&self, endpoint: Endpoint, body: &Value) -> RawResponse {
        let mut state = self.state.lock();
        match endpoint {
            Endpoint::View => {
                let contract = str_field(body, "contract");
                let method = str_field(body, "method");
                match execute(&mut state, contract, method, body.get("params"), None) {
                    Ok(value) => RawResponse::ok(value),
                    Err(error) => RawResponse::ok(json!({
                        "error": format!("wasm execution failed with error: {}", error),
                        "logs": [],
                    })),
                }
            }
            Endpoint::Call => {
                let contract = str_field(body, "contract");
                let method = str_field(body, "method");
                let caller = str_field(body, "account_id");
                match execute(&mut state, contract, method, body.get("params"), Some(caller)) {
                    Ok(value) => {
                        let bytes = match value {
                            Value::Null => Vec::new(),
                            other => other.to_string().into_bytes(),
                        };
                        RawResponse::ok(json!({
                            "status": { "SuccessValue": STANDARD.encode(bytes) },
                            "transaction": { "signer_id": caller, "receiver_id": contract },
                        }))
                    }
                    Err(error) => RawResponse::new(
                        400,
                        json!({
                            "type": "FunctionCallError",
                            "kind": error,
                        }),
                    ),
                }
            }
            Endpoint::CodeHash => {
                let account = str_field(body, "account_id");
                let hash = state
                    .accounts
                    .get(account)
                    .and_then(|a| a.code)
                    .map(|h| Value::String(h.to_hex()))
                    .unwrap_or(Value::Null);
                RawResponse::ok(json!({ "account_id": account, "code_hash": hash }))
            }
            Endpoint::Deploy => {
                let account = str_field(body, "account_id").to_string();
                if AccountId::validate(&account).is_err() {
                    return RawResponse::new(
                        400,
                        json!({"type": "DeploymentError", "message": format!("invalid account {:?}", account)}),
                    );
                }
                let code = match STANDARD.decode(str_field(body, "code_base64")) {
                    Ok(code) => code,
                    Err(e) => {
                        return RawResponse::new(
                            400,
                            json!({"type": "DeploymentError", "message": format!("invalid code_base64: {}", e)}),
                        )
                    }
                };
                if !code.starts_with(b"\0asm") {
                    return RawResponse::new(
                        400,
                        json!({"type": "CompilationError", "message": "PrepareError: Deserialization"}),
                    );
                }
                state.accounts.entry(account).or_default().code = Some(CodeHash::of_code(&code));
                RawResponse::ok(json!({ "status": { "SuccessValue": "" } }))
            }
        }
    }
}

#[async_trait]
impl Transport for Sandbox {
    async fn request_json(&self, endpoint: Endpoint, body: Value) -> Result<RawResponse, SdkError> {
        let fault = {
            let mut state = self.state.lock();
            state.requests.push(RecordedRequest {
                endpoint,
                body: body.clone(),
            });
            state.faults.pop_front()
        };

        match fault {
            Some(Fault::Timeout) => Err(SdkError::Transport(format!(
                "{} request timed out",
                endpoint
            ))),
            Some(Fault::Respond(response)) => Ok(response),
            None => Ok(self.handle(endpoint, &body)),
        }
    }
}

fn str_field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Run a field-store method. `caller` is `None` for views.
fn execute(
    state: &mut SandboxState,
    contract: &str,
    method: &str,
    params: Option<&Value>,
    caller: Option<&str>,
) -> Result<Value, Value> {
    let account = match state.accounts.get_mut(contract) {
        Some(account) if account.code.is_some() => account,
        _ => {
            return Err(json!({
                "CompilationError": { "CodeDoesNotExist": { "account_id": contract } }
            }))
        }
    };

    let empty = Map::new();
    let params = params.and_then(Value::as_object).unwrap_or(&empty);

    if let Some(field) = method.strip_prefix("get_") {
        return Ok(amount_value(account.fields.get(field).copied().unwrap_or(0)));
    }

    if let Some(field) = method.strip_prefix("set_") {
        let caller = match caller {
            Some(caller) => caller,
            None => return Err(json!({ "HostError": "ProhibitedInView" })),
        };
        if caller != contract {
            return Err(panic_error(&format!("Method {} is private", method)));
        }
        let amount = match params.get("amount") {
            Some(value) => parse_balance(value).ok_or_else(|| {
                panic_error(&format!(
                    "Failed to deserialize input from JSON.: invalid value: {}, expected u128",
                    value
                ))
            })?,
            None => {
                return Err(panic_error(
                    "Failed to deserialize input from JSON.: missing field `amount`",
                ))
            }
        };
        account.fields.insert(field.to_string(), amount);
        return Ok(Value::Null);
    }

    Err(json!({ "MethodResolveError": "MethodNotFound" }))
}

/// Amounts past `u64` are returned as decimal strings
fn amount_value(amount: Balance) -> Value {
    match u64::try_from(amount) {
        Ok(small) => json!(small),
        Err(_) => Value::String(amount.to_string()),
    }
}

fn panic_error(message: &str) -> Value {
    json!({ "ExecutionError": format!("Smart contract panicked: {}", message) })
}
