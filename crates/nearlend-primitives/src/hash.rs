//! Contract code hash

use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Hash parsing error
#[derive(Debug, Error)]
pub enum HashError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Length received
        got: usize,
    },
}

/// SHA-256 digest of deployed contract bytecode
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CodeHash([u8; 32]);

impl CodeHash {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Hash reported for accounts without code
    pub const EMPTY: CodeHash = CodeHash([0u8; 32]);

    /// Hash contract bytecode
    pub fn of_code(code: &[u8]) -> Self {
        let digest = Sha256::digest(code);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        CodeHash(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, HashError> {
        if slice.len() != Self::LEN {
            return Err(HashError::InvalidLength {
                expected: Self::LEN,
                got: slice.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(CodeHash(bytes))
    }

    /// Parse from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| HashError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Check if this is the empty-code hash
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Convert to lowercase hex string without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for CodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodeHash({})", self.to_hex())
    }
}

impl fmt::Display for CodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
