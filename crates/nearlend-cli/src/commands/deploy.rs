//! Deploy command

use std::path::PathBuf;

use clap::Args;
use nearlend_sdk::{BytecodeRef, CodeHash, DeployOptions, HarnessConfig, InvocationClient};

use super::contract_handle;
use crate::{output::Output, CliError};

/// Arguments for `deploy`
#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Target: account record name or account id
    pub contract: String,
    /// Compiled contract (.wasm)
    pub wasm: PathBuf,
    /// Replace different code already deployed at the target
    #[arg(long)]
    pub force: bool,
}

/// Install a contract; a no-op when the same code is already there
pub async fn deploy(args: DeployArgs, config: &HarnessConfig, json: bool) -> Result<(), CliError> {
    let handle = contract_handle(config, &args.contract)?;
    let code = BytecodeRef::path(&args.wasm).load()?;
    let hash = CodeHash::of_code(&code);

    let client = InvocationClient::connect(config)?;
    let options = DeployOptions { force: args.force };
    let deployed = client
        .deploy(&handle, &BytecodeRef::Bytes(code), options)
        .await?;

    Output::new(json)
        .field("contract", deployed.address().as_str())
        .field("code_hash", &hash.to_hex())
        .message(&format!("{} runs code {}", deployed, hash))
        .print();

    Ok(())
}
