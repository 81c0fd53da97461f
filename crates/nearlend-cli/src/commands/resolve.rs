//! Account record commands

use nearlend_sdk::{AddressResolver, FileRegistry, HarnessConfig};

use crate::{output::Output, CliError};

/// Print the address behind an account record
pub fn resolve(config: &HarnessConfig, name: &str, json: bool) -> Result<(), CliError> {
    let registry = FileRegistry::new(&config.accounts_dir);
    let address = registry.resolve(name)?;

    Output::new(json)
        .field("name", name)
        .field("address", address.as_str())
        .message(address.as_str())
        .print();

    Ok(())
}

/// Print every account record
pub fn list(config: &HarnessConfig, json: bool) -> Result<(), CliError> {
    let registry = FileRegistry::new(&config.accounts_dir);
    let records = registry.records()?;

    let message = if records.is_empty() {
        format!("No account records in {}", config.accounts_dir.display())
    } else {
        let width = records.iter().map(|r| r.name.len()).max().unwrap_or(0);
        records
            .iter()
            .map(|r| format!("{:width$}  {}", r.name, r.address, width = width))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Output::new(json)
        .field_value("accounts", serde_json::to_value(&records)?)
        .message(&message)
        .print();

    Ok(())
}
