//! InvocationClient - view/call client for deployed contracts

use nearlend_primitives::{AccountId, Balance, Gas};
use serde_json::{json, Value};

use crate::classify::classify;
use crate::config::{CallerPolicy, HarnessConfig};
use crate::contract::{Contract, ContractHandle};
use crate::transport::{Endpoint, Transport};
use crate::types::{ErrorKind, InvocationRequest, InvocationResult, Operation};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Default gas attached to calls (100 TGas)
pub const DEFAULT_ATTACHED_GAS: Gas = 100 * nearlend_primitives::TGAS;

/// Client issuing `view` and `call` invocations against contract handles
///
/// Every invocation is a single request on the transport. Invocations are
/// never retried, batched or reordered: awaiting them one after another
/// observes their effects in issue order.
pub struct InvocationClient {
    transport: Box<dyn Transport>,
    caller_policy: CallerPolicy,
    attached_gas: Gas,
    attached_deposit: Balance,
}

impl InvocationClient {
    /// Create a client with HTTP transport from configuration
    #[cfg(feature = "http")]
    pub fn connect(config: &HarnessConfig) -> Result<Self, SdkError> {
        config.validate()?;
        let transport = HttpTransport::with_timeout(&config.api_url, config.timeout())?;
        Self::from_config(transport, config)
    }

    /// Create a client with a custom transport and default settings
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            caller_policy: CallerPolicy::default(),
            attached_gas: DEFAULT_ATTACHED_GAS,
            attached_deposit: 0,
        }
    }

    /// Create a client with a custom transport and settings from configuration
    pub fn from_config(
        transport: impl Transport + 'static,
        config: &HarnessConfig,
    ) -> Result<Self, SdkError> {
        Ok(Self {
            transport: Box::new(transport),
            caller_policy: config.default_caller.clone(),
            attached_gas: config.attached_gas,
            attached_deposit: config.attached_deposit()?,
        })
    }

    /// Set the default caller policy
    pub fn with_caller_policy(mut self, policy: CallerPolicy) -> Self {
        self.caller_policy = policy;
        self
    }

    /// Set the gas attached to calls
    pub fn with_attached_gas(mut self, gas: Gas) -> Self {
        self.attached_gas = gas;
        self
    }

    /// Set the deposit attached to calls
    pub fn with_attached_deposit(mut self, deposit: Balance) -> Self {
        self.attached_deposit = deposit;
        self
    }

    /// Default caller policy
    pub fn caller_policy(&self) -> &CallerPolicy {
        &self.caller_policy
    }

    /// Caller a request to `handle` is attributed to
    pub fn caller_for(&self, handle: &ContractHandle, request: &InvocationRequest) -> AccountId {
        match request.context() {
            Some(context) => context.account_id.clone(),
            None => self.caller_policy.caller_for(handle.address()),
        }
    }

    /// Bind a handle to this client
    pub fn contract(&self, handle: &ContractHandle) -> Contract<'_> {
        Contract::new(self, handle.clone())
    }

    // ==================== Invocations ====================

    /// Read-only invocation
    pub async fn view(&self, handle: &ContractHandle, request: &InvocationRequest) -> InvocationResult {
        let mut body = json!({
            "contract": handle.address(),
            "method": request.method(),
            "params": Value::Object(request.args().clone()),
        });
        if let Some(context) = request.context() {
            body["account_id"] = json!(context.account_id);
        }

        tracing::debug!("view {}.{}", handle, request.method());
        let raw = self.transport.request_json(Endpoint::View, body).await;
        let result = classify(Operation::View, raw);
        log_failure(Operation::View, handle, request.method(), &result);
        result
    }

    /// State-mutating invocation
    pub async fn call(&self, handle: &ContractHandle, request: &InvocationRequest) -> InvocationResult {
        let caller = self.caller_for(handle, request);
        let body = json!({
            "account_id": caller,
            "contract": handle.address(),
            "method": request.method(),
            "params": Value::Object(request.args().clone()),
            "attached_gas": self.attached_gas,
            "attached_tokens": self.attached_deposit.to_string(),
        });

        tracing::debug!("call {}.{} as {}", handle, request.method(), caller);
        let raw = self.transport.request_json(Endpoint::Call, body).await;
        let result = classify(Operation::Call, raw);
        log_failure(Operation::Call, handle, request.method(), &result);
        result
    }

    pub(crate) async fn send(&self, endpoint: Endpoint, body: Value) -> Result<crate::RawResponse, SdkError> {
        self.transport.request_json(endpoint, body).await
    }
}

fn log_failure(operation: Operation, handle: &ContractHandle, method: &str, result: &InvocationResult) {
    if let InvocationResult::Failure { error_kind, detail } = result {
        match error_kind {
            ErrorKind::TransportError => {
                tracing::warn!("{:?} {}.{} failed: {}: {}", operation, handle, method, error_kind, detail)
            }
            _ => tracing::debug!("{:?} {}.{} rejected: {}: {}", operation, handle, method, error_kind, detail),
        }
    }
}
