//! CLI commands

pub mod deploy;
pub mod invoke;
pub mod resolve;

use nearlend_sdk::{AccountId, AddressResolver, ContractHandle, FileRegistry, HarnessConfig, SdkError};

use crate::CliError;

/// Look `name` up in the accounts directory; fall back to reading it as an
/// account id when no record has that name
pub fn account(config: &HarnessConfig, name: &str) -> Result<AccountId, CliError> {
    let registry = FileRegistry::new(&config.accounts_dir);
    match registry.resolve(name) {
        Ok(address) => Ok(address),
        Err(SdkError::NotFound(_)) => {
            tracing::debug!(name, "no account record, reading as account id");
            let handle = ContractHandle::new(name)?;
            Ok(handle.address().clone())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle for a contract given by record name or account id
pub fn contract_handle(config: &HarnessConfig, contract: &str) -> Result<ContractHandle, CliError> {
    account(config, contract).map(ContractHandle::from)
}
