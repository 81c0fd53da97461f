//! # nearlend-primitives
//!
//! Primitive types for the nearlend contract harness.
//!
//! This crate provides the account identifier used to address deployed
//! contracts and the code hash used to compare contract bytecode.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod account;
mod hash;

pub use account::{AccountId, AccountIdError};
pub use hash::{CodeHash, HashError};

/// Gas amount attached to a function call
pub type Gas = u64;

/// Token amount (yoctoNEAR)
pub type Balance = u128;

/// One teragas
pub const TGAS: Gas = 1_000_000_000_000;
