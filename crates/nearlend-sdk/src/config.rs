//! Harness configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use nearlend_primitives::{AccountId, Balance, Gas, TGAS};
use serde::{Deserialize, Serialize};

use crate::SdkError;

/// Environment variable overriding [`HarnessConfig::api_url`]
pub const ENV_API_URL: &str = "NEARLEND_API_URL";

/// Environment variable overriding [`HarnessConfig::accounts_dir`]
pub const ENV_ACCOUNTS_DIR: &str = "NEARLEND_ACCOUNTS_DIR";

/// Identity a `call` is attributed to when the request carries no context
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerPolicy {
    /// The contract's own address (a self-call)
    #[default]
    ContractSelf,
    /// A fixed account, e.g. the root account that provisioned the contracts
    Account(AccountId),
}

impl CallerPolicy {
    /// Caller for a call to `contract`
    pub fn caller_for(&self, contract: &AccountId) -> AccountId {
        match self {
            CallerPolicy::ContractSelf => contract.clone(),
            CallerPolicy::Account(account) => account.clone(),
        }
    }
}

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base URL of the contract REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Directory of account records
    #[serde(default = "default_accounts_dir")]
    pub accounts_dir: PathBuf,
    /// Default caller for `call`
    #[serde(default)]
    pub default_caller: CallerPolicy,
    /// Gas attached to every `call`
    #[serde(default = "default_attached_gas")]
    pub attached_gas: Gas,
    /// Deposit attached to every `call`, in yoctoNEAR (decimal string)
    #[serde(default = "default_attached_tokens")]
    pub attached_tokens: String,
    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_accounts_dir() -> PathBuf {
    PathBuf::from("neardev/accounts")
}

fn default_attached_gas() -> Gas {
    100 * TGAS
}

fn default_attached_tokens() -> String {
    "0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            accounts_dir: default_accounts_dir(),
            default_caller: CallerPolicy::default(),
            attached_gas: default_attached_gas(),
            attached_tokens: default_attached_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HarnessConfig {
    /// Parse from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, SdkError> {
        let config: HarnessConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SdkError> {
        let content = std::fs::read_to_string(path).map_err(|source| SdkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` when it exists, else defaults, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, SdkError> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        Ok(config.with_env())
    }

    /// Apply `NEARLEND_*` environment overrides
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        if let Some(dir) = lookup(ENV_ACCOUNTS_DIR).filter(|v| !v.is_empty()) {
            self.accounts_dir = PathBuf::from(dir);
        }
        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.api_url.trim().is_empty() {
            return Err(SdkError::Config("api_url is empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(SdkError::Config("timeout_secs must be positive".to_string()));
        }
        self.attached_deposit()?;
        Ok(())
    }

    /// Parsed attached deposit
    pub fn attached_deposit(&self) -> Result<Balance, SdkError> {
        self.attached_tokens.trim().parse::<Balance>().map_err(|e| {
            SdkError::Config(format!(
                "attached_tokens {:?} is not a yoctoNEAR amount: {}",
                self.attached_tokens, e
            ))
        })
    }

    /// Transport timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, SdkError> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }
}
