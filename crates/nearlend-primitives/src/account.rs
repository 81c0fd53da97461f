//! Account identifier (the network address of accounts and contracts)

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account id parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountIdError {
    /// Empty account id
    #[error("account id is empty")]
    Empty,
    /// Invalid length
    #[error("invalid account id length: expected {min}..={max} characters, got {got}")]
    InvalidLength {
        /// Minimum length
        min: usize,
        /// Maximum length
        max: usize,
        /// Actual length
        got: usize,
    },
    /// Character outside the allowed set
    #[error("invalid character {ch:?} at index {index}")]
    InvalidChar {
        /// Offending character
        ch: char,
        /// Byte index
        index: usize,
    },
    /// Separator at the start, end, or next to another separator
    #[error("misplaced separator {ch:?} at index {index}")]
    MisplacedSeparator {
        /// Offending separator
        ch: char,
        /// Byte index
        index: usize,
    },
}

/// Validated account identifier
///
/// Follows the NEAR naming grammar: 2 to 64 characters drawn from `a-z`,
/// `0-9`, `-`, `_` and `.`, where `-`, `_` and `.` only appear between
/// alphanumeric runs. Named accounts (`dtoken.nearlend.testnet`), dev accounts
/// (`dev-1639659058556-60126760016852`) and implicit 64-hex accounts all fit.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Minimum account id length
    pub const MIN_LEN: usize = 2;

    /// Maximum account id length
    pub const MAX_LEN: usize = 64;

    /// Validate an account id without allocating
    pub fn validate(s: &str) -> Result<(), AccountIdError> {
        if s.is_empty() {
            return Err(AccountIdError::Empty);
        }
        if s.len() < Self::MIN_LEN || s.len() > Self::MAX_LEN {
            return Err(AccountIdError::InvalidLength {
                min: Self::MIN_LEN,
                max: Self::MAX_LEN,
                got: s.len(),
            });
        }

        let mut last_was_separator = true;
        for (index, ch) in s.char_indices() {
            match ch {
                'a'..='z' | '0'..='9' => last_was_separator = false,
                '-' | '_' | '.' => {
                    if last_was_separator {
                        return Err(AccountIdError::MisplacedSeparator { ch, index });
                    }
                    last_was_separator = true;
                }
                _ => return Err(AccountIdError::InvalidChar { ch, index }),
            }
        }

        if last_was_separator {
            // Non-empty input, so the trailing character is a separator
            let index = s.len() - 1;
            let ch = s[index..].chars().next().unwrap_or('.');
            return Err(AccountIdError::MisplacedSeparator { ch, index });
        }

        Ok(())
    }

    /// Parse and validate an account id
    pub fn new(s: impl Into<String>) -> Result<Self, AccountIdError> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(AccountId(s))
    }

    /// Get the account id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for AccountId {
    type Error = AccountIdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for AccountId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.0)
        }
    }

    impl<'de> Deserialize<'de> for AccountId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            AccountId::new(s).map_err(de::Error::custom)
        }
    }
}
