//! Test harness for E2E testing
//!
//! A [`TestHarness`] is the per-suite fixture: it owns the account resolver
//! and the invocation client, built once at suite setup and dropped at
//! teardown. Nothing is shared between suites.

use std::sync::Arc;

use nearlend_primitives::{AccountId, Balance};
use nearlend_sdk::{
    AddressResolver, Contract, ContractHandle, ErrorKind, FileRegistry, HarnessConfig,
    InvocationClient, InvocationResult, MemoryRegistry, Sandbox,
};

use crate::contracts::{
    getter, CONTROLLER, CONTROLLER_ADDRESS, DTOKEN, DTOKEN_ADDRESS, DTOKEN_CODE,
    INITIAL_TOTAL_BORROWS, INITIAL_TOTAL_SUPPLIES, ROOT, ROOT_ADDRESS, TOTAL_BORROWS,
    TOTAL_SUPPLIES,
};
use crate::{E2EError, E2EResult};

/// Per-suite fixture
pub struct TestHarness {
    resolver: Box<dyn AddressResolver>,
    client: InvocationClient,
    sandbox: Option<Arc<Sandbox>>,
}

impl TestHarness {
    /// Harness over the in-memory sandbox
    ///
    /// Provisions the `root`, `dtoken` and `controller` records. The dtoken
    /// is deployed with [`INITIAL_TOTAL_SUPPLIES`] and
    /// [`INITIAL_TOTAL_BORROWS`]; the controller account exists without code.
    pub fn new() -> E2EResult<Self> {
        let registry = MemoryRegistry::new()
            .with_record(ROOT, ROOT_ADDRESS)
            .with_record(DTOKEN, DTOKEN_ADDRESS)
            .with_record(CONTROLLER, CONTROLLER_ADDRESS);

        let dtoken = parse_address(DTOKEN_ADDRESS)?;
        let sandbox = Arc::new(Sandbox::new());
        sandbox.install(&dtoken, DTOKEN_CODE);
        sandbox.set_field(&dtoken, TOTAL_SUPPLIES, INITIAL_TOTAL_SUPPLIES);
        sandbox.set_field(&dtoken, TOTAL_BORROWS, INITIAL_TOTAL_BORROWS);

        let client = InvocationClient::with_transport(sandbox.clone());
        tracing::debug!("Sandbox harness ready");
        Ok(Self {
            resolver: Box::new(registry),
            client,
            sandbox: Some(sandbox),
        })
    }

    /// Harness against a live REST API server
    pub fn live(config: &HarnessConfig) -> E2EResult<Self> {
        let client = InvocationClient::connect(config)?;
        tracing::info!(
            "Live harness: {} (accounts in {})",
            config.api_url,
            config.accounts_dir.display()
        );
        Ok(Self {
            resolver: Box::new(FileRegistry::new(&config.accounts_dir)),
            client,
            sandbox: None,
        })
    }

    /// Harness from explicit parts
    pub fn with_parts(resolver: impl AddressResolver + 'static, client: InvocationClient) -> Self {
        Self {
            resolver: Box::new(resolver),
            client,
            sandbox: None,
        }
    }

    /// The invocation client
    pub fn client(&self) -> &InvocationClient {
        &self.client
    }

    /// The sandbox runtime, when not running live
    pub fn sandbox(&self) -> Option<&Sandbox> {
        self.sandbox.as_deref()
    }

    /// Resolve an account record
    pub fn resolve(&self, name: &str) -> E2EResult<AccountId> {
        Ok(self.resolver.resolve(name)?)
    }

    /// Handle for the contract behind an account record
    pub fn handle(&self, name: &str) -> E2EResult<ContractHandle> {
        Ok(ContractHandle::from(self.resolve(name)?))
    }

    /// Bind a handle to the harness client
    pub fn contract(&self, handle: &ContractHandle) -> Contract<'_> {
        self.client.contract(handle)
    }

    /// Read a field through its getter, failing on any invocation failure
    pub async fn read_field(&self, handle: &ContractHandle, field: &str) -> E2EResult<Balance> {
        let method = getter(field);
        let result = self
            .contract(handle)
            .view(&method, serde_json::json!({}))
            .await?;
        Ok(result.as_balance()?)
    }
}

fn parse_address(address: &str) -> E2EResult<AccountId> {
    AccountId::new(address).map_err(|e| E2EError::Setup(format!("{}: {}", address, e)))
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Extension trait for invocation result assertions
pub trait InvocationAssertions {
    /// Assert the invocation succeeded
    fn assert_success(&self) -> &Self;

    /// Assert the invocation failed
    fn assert_failure(&self) -> &Self;

    /// Assert the failure kind
    fn assert_error_kind(&self, expected: ErrorKind) -> &Self;

    /// Assert the success value is the given amount
    fn assert_balance(&self, expected: Balance) -> &Self;
}

impl InvocationAssertions for InvocationResult {
    fn assert_success(&self) -> &Self {
        assert!(self.is_success(), "Expected invocation to succeed, got {:?}", self);
        self
    }

    fn assert_failure(&self) -> &Self {
        assert!(self.is_failure(), "Expected invocation to fail, got {:?}", self);
        self
    }

    fn assert_error_kind(&self, expected: ErrorKind) -> &Self {
        assert_eq!(
            self.error_kind(),
            Some(expected),
            "Error kind mismatch: {:?}",
            self
        );
        self
    }

    fn assert_balance(&self, expected: Balance) -> &Self {
        match self.as_balance() {
            Ok(actual) => assert_eq!(
                actual, expected,
                "Balance mismatch: expected {}, got {}",
                expected, actual
            ),
            Err(e) => panic!("Expected balance {}, got {:?} ({})", expected, self, e),
        }
        self
    }
}
