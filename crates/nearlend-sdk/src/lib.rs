//! # nearlend-sdk
//!
//! Contract interaction harness for nearlend contracts.
//!
//! ## Features
//!
//! - **AddressResolver**: account name -> address lookup (`FileRegistry`, `MemoryRegistry`)
//! - **ContractHandle**: value-typed reference to a deployed contract
//! - **InvocationClient**: `view` and `call` invocations, one request each, no retries
//! - **classify**: normalizes raw responses into an [`InvocationResult`]
//! - **Deployment**: idempotent code installation
//! - **Sandbox**: in-memory runtime for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nearlend_sdk::{AddressResolver, ContractHandle, FileRegistry, HarnessConfig, InvocationClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HarnessConfig::load(None)?;
//!     let registry = FileRegistry::new(&config.accounts_dir);
//!     let client = InvocationClient::connect(&config)?;
//!
//!     let dtoken = ContractHandle::from(registry.resolve("dtoken")?);
//!     let contract = client.contract(&dtoken);
//!
//!     let supply = contract.view("get_total_supplies", json!({})).await?.as_balance()?;
//!     let result = contract
//!         .call("set_total_supplies", json!({ "amount": supply.to_string() }))
//!         .await?;
//!     if let Some(kind) = result.error_kind() {
//!         println!("rejected: {} ({})", kind, result.detail().unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod classify;
mod client;
pub mod config;
mod contract;
mod deploy;
mod error;
mod resolver;
pub mod sandbox;
mod transport;
pub mod types;

pub use classify::classify;
pub use client::{InvocationClient, DEFAULT_ATTACHED_GAS};
pub use config::{CallerPolicy, HarnessConfig};
pub use contract::{Contract, ContractHandle};
pub use deploy::{BytecodeRef, DeployOptions};
pub use error::SdkError;
pub use resolver::{AccountRecord, AddressResolver, FileRegistry, MemoryRegistry};
pub use sandbox::Sandbox;
pub use transport::{decode_body, Endpoint, RawResponse, Transport};
pub use types::{CallContext, ErrorKind, InvocationRequest, InvocationResult, Operation};

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use nearlend_primitives::{AccountId, Balance, CodeHash, Gas};
