//! Contract handles and per-contract invocation helpers

use std::fmt;

use nearlend_primitives::AccountId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::InvocationClient;
use crate::deploy::{BytecodeRef, DeployOptions};
use crate::types::{InvocationRequest, InvocationResult};
use crate::SdkError;

/// Reference to one deployed contract instance
///
/// Handles carry no connection state; two handles over the same address are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractHandle {
    address: AccountId,
}

impl ContractHandle {
    /// Create a handle, validating the address
    pub fn new(address: &str) -> Result<Self, SdkError> {
        if address.is_empty() {
            return Err(SdkError::InvalidAddress("contract address is empty".to_string()));
        }
        let address = AccountId::new(address)
            .map_err(|e| SdkError::InvalidAddress(format!("{:?}: {}", address, e)))?;
        Ok(Self { address })
    }

    /// Contract address
    pub fn address(&self) -> &AccountId {
        &self.address
    }
}

impl From<AccountId> for ContractHandle {
    fn from(address: AccountId) -> Self {
        Self { address }
    }
}

impl fmt::Display for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// A contract handle bound to a client
///
/// Shorthand for building [`InvocationRequest`]s against one contract.
/// Argument validation errors are returned as `Err`; remote outcomes are
/// always `Ok(InvocationResult)`.
pub struct Contract<'a> {
    client: &'a InvocationClient,
    handle: ContractHandle,
}

impl<'a> Contract<'a> {
    /// Bind `handle` to `client`
    pub fn new(client: &'a InvocationClient, handle: ContractHandle) -> Self {
        Self { client, handle }
    }

    /// The bound handle
    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    /// Read-only call with no caller context
    pub async fn view(&self, method: &str, args: Value) -> Result<InvocationResult, SdkError> {
        let request = InvocationRequest::new(method)?.with_args(args)?;
        Ok(self.client.view(&self.handle, &request).await)
    }

    /// Read-only call on behalf of `caller`
    pub async fn view_as(
        &self,
        method: &str,
        args: Value,
        caller: &AccountId,
    ) -> Result<InvocationResult, SdkError> {
        let request = InvocationRequest::new(method)?
            .with_args(args)?
            .with_caller(caller.clone());
        Ok(self.client.view(&self.handle, &request).await)
    }

    /// Mutating call attributed to the client's default caller
    pub async fn call(&self, method: &str, args: Value) -> Result<InvocationResult, SdkError> {
        let request = InvocationRequest::new(method)?.with_args(args)?;
        Ok(self.client.call(&self.handle, &request).await)
    }

    /// Mutating call attributed to `caller`
    pub async fn call_as(
        &self,
        method: &str,
        args: Value,
        caller: &AccountId,
    ) -> Result<InvocationResult, SdkError> {
        let request = InvocationRequest::new(method)?
            .with_args(args)?
            .with_caller(caller.clone());
        Ok(self.client.call(&self.handle, &request).await)
    }

    /// Install `bytecode` at this contract's address
    pub async fn deploy(
        &self,
        bytecode: &BytecodeRef,
        options: DeployOptions,
    ) -> Result<ContractHandle, SdkError> {
        self.client.deploy(&self.handle, bytecode, options).await
    }
}
