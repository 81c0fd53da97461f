//! Deployment gate

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use nearlend_primitives::CodeHash;
use serde_json::{json, Value};

use crate::classify::classify;
use crate::client::InvocationClient;
use crate::contract::ContractHandle;
use crate::transport::Endpoint;
use crate::types::{InvocationResult, Operation};
use crate::SdkError;

/// Where contract bytecode comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BytecodeRef {
    /// A compiled `.wasm` file
    Path(PathBuf),
    /// Bytecode already in memory
    Bytes(Bytes),
}

impl BytecodeRef {
    /// Reference a file
    pub fn path(path: impl Into<PathBuf>) -> Self {
        BytecodeRef::Path(path.into())
    }

    /// Reference in-memory code
    pub fn bytes(code: impl Into<Bytes>) -> Self {
        BytecodeRef::Bytes(code.into())
    }

    /// Read the bytecode
    pub fn load(&self) -> Result<Bytes, SdkError> {
        let code = match self {
            BytecodeRef::Bytes(code) => code.clone(),
            BytecodeRef::Path(path) => std::fs::read(path).map(Bytes::from).map_err(|e| {
                SdkError::Deployment(format!("cannot read bytecode {}: {}", path.display(), e))
            })?,
        };
        if code.is_empty() {
            return Err(SdkError::Deployment("bytecode is empty".to_string()));
        }
        Ok(code)
    }
}

/// Deployment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Replace code that differs from the bytecode being deployed
    pub force: bool,
}

impl DeployOptions {
    /// Options that allow replacing existing code
    pub fn force() -> Self {
        Self { force: true }
    }
}

impl InvocationClient {
    /// Hash of the code currently deployed at `handle`, `None` when empty
    pub async fn code_hash(&self, handle: &ContractHandle) -> Result<Option<CodeHash>, SdkError> {
        let raw = self
            .send(Endpoint::CodeHash, json!({ "account_id": handle.address() }))
            .await;

        let value = match classify(Operation::View, raw) {
            InvocationResult::Success { value } => value,
            InvocationResult::Failure { error_kind, detail } => {
                return Err(SdkError::Deployment(format!(
                    "cannot read code hash of {}: {}: {}",
                    handle, error_kind, detail
                )))
            }
        };

        let hash = match value.get("code_hash").unwrap_or(&Value::Null) {
            Value::Null => return Ok(None),
            Value::String(hex) => CodeHash::from_hex(hex).map_err(|e| {
                SdkError::Deployment(format!("malformed code hash for {}: {}", handle, e))
            })?,
            other => {
                return Err(SdkError::Deployment(format!(
                    "malformed code hash for {}: {}",
                    handle, other
                )))
            }
        };

        Ok((!hash.is_empty()).then_some(hash))
    }

    /// Install `bytecode` at `handle`'s address
    ///
    /// Deploying code identical to what is already installed is a no-op that
    /// sends nothing but the code hash query. Replacing different code needs
    /// [`DeployOptions::force`]. A failed installation is not rolled back.
    pub async fn deploy(
        &self,
        handle: &ContractHandle,
        bytecode: &BytecodeRef,
        options: DeployOptions,
    ) -> Result<ContractHandle, SdkError> {
        let code = bytecode.load()?;
        let local = CodeHash::of_code(&code);

        match self.code_hash(handle).await? {
            Some(remote) if remote == local => {
                tracing::info!("{} already runs code {}, skipping deploy", handle, local);
                return Ok(handle.clone());
            }
            Some(remote) if !options.force => {
                return Err(SdkError::Deployment(format!(
                    "{} holds different code ({}, deploying {}); use force to replace it",
                    handle, remote, local
                )));
            }
            Some(remote) => tracing::info!("Replacing code {} at {}", remote, handle),
            None => {}
        }

        let body = json!({
            "account_id": handle.address(),
            "code_base64": STANDARD.encode(&code),
        });
        let raw = self.send(Endpoint::Deploy, body).await;
        match classify(Operation::Deploy, raw) {
            InvocationResult::Success { .. } => {
                tracing::info!("Deployed {} bytes ({}) to {}", code.len(), local, handle);
                Ok(handle.clone())
            }
            InvocationResult::Failure { error_kind, detail } => Err(SdkError::Deployment(format!(
                "deploy to {} failed: {}: {}",
                handle, error_kind, detail
            ))),
        }
    }
}
