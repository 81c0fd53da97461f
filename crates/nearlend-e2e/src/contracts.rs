//! Fixture accounts and contract bytecode for E2E testing.
//!
//! The account names match the records the provisioning scripts write to
//! `neardev/accounts`: one file per name holding the account address.
//!
//! # Contracts
//!
//! ## dtoken
//! - `get_total_supplies()` / `set_total_supplies({amount})`
//! - `get_total_borrows()` / `set_total_borrows({amount})`
//!
//! Setters are private: only the dtoken account itself may call them, and
//! `amount` is an unsigned 128-bit integer.
//!
//! # Bytecode
//!
//! The sandbox only hashes and stores code, so the fixtures are minimal
//! modules: the wasm header followed by a custom section naming the contract.

use bytes::Bytes;
use nearlend_primitives::Balance;
use nearlend_sdk::BytecodeRef;

// ============================================================================
// Accounts
// ============================================================================

/// Record name of the root (deployer) account
pub const ROOT: &str = "root";

/// Record name of the dtoken contract
pub const DTOKEN: &str = "dtoken";

/// Record name of the controller contract
pub const CONTROLLER: &str = "controller";

/// Sandbox address of the root account
pub const ROOT_ADDRESS: &str = "nearlend.testnet";

/// Sandbox address of the dtoken contract
pub const DTOKEN_ADDRESS: &str = "dtoken.nearlend.testnet";

/// Sandbox address of the controller contract
pub const CONTROLLER_ADDRESS: &str = "ctrl.nearlend.testnet";

// ============================================================================
// dtoken
// ============================================================================

/// Total supplies the sandbox dtoken starts with
pub const INITIAL_TOTAL_SUPPLIES: Balance = 5;

/// Total borrows the sandbox dtoken starts with
pub const INITIAL_TOTAL_BORROWS: Balance = 0;

/// Supplies field of the dtoken
pub const TOTAL_SUPPLIES: &str = "total_supplies";

/// Borrows field of the dtoken
pub const TOTAL_BORROWS: &str = "total_borrows";

/// dtoken module: header + custom section "dtoken"
pub const DTOKEN_CODE: &[u8] = &[
    0x00, 0x61, 0x73, 0x6d, // \0asm
    0x01, 0x00, 0x00, 0x00, // version 1
    0x00, 0x07, 0x06, b'd', b't', b'o', b'k', b'e', b'n',
];

/// controller module: header + custom section "controller"
pub const CONTROLLER_CODE: &[u8] = &[
    0x00, 0x61, 0x73, 0x6d, // \0asm
    0x01, 0x00, 0x00, 0x00, // version 1
    0x00, 0x0b, 0x0a, b'c', b'o', b'n', b't', b'r', b'o', b'l', b'l', b'e', b'r',
];

/// Getter method for a field
pub fn getter(field: &str) -> String {
    format!("get_{}", field)
}

/// Setter method for a field
pub fn setter(field: &str) -> String {
    format!("set_{}", field)
}

/// dtoken bytecode
pub fn dtoken_bytecode() -> BytecodeRef {
    BytecodeRef::Bytes(Bytes::from_static(DTOKEN_CODE))
}

/// controller bytecode
pub fn controller_bytecode() -> BytecodeRef {
    BytecodeRef::Bytes(Bytes::from_static(CONTROLLER_CODE))
}
