//! # nearlend-e2e
//!
//! End-to-end scenarios for the nearlend contracts.
//!
//! ## Design Philosophy
//!
//! 1. **Declarative**: scenarios describe WHAT, the harness does the wiring
//! 2. **Isolated**: each suite builds its own [`TestHarness`]
//! 3. **Portable**: the same scenarios run on the in-memory sandbox or a live
//!    REST API server
//!
//! ## Usage
//!
//! ```ignore
//! cargo test -p nearlend-e2e
//! # against a running REST API server and provisioned accounts
//! NEARLEND_API_URL=http://localhost:3000 cargo test -p nearlend-e2e -- --ignored
//! ```

pub mod contracts;
mod harness;
pub mod scenarios;

pub use harness::{InvocationAssertions, TestHarness};

/// Test result
pub type E2EResult<T> = Result<T, E2EError>;

/// E2E test errors
#[derive(Debug, thiserror::Error)]
pub enum E2EError {
    /// Setup failed
    #[error("setup failed: {0}")]
    Setup(String),

    /// Harness error
    #[error(transparent)]
    Sdk(#[from] nearlend_sdk::SdkError),

    /// Assertion failed
    #[error("assertion failed: {0}")]
    Assertion(String),
}
