//! View and call commands

use clap::Args;
use nearlend_sdk::{HarnessConfig, InvocationClient, InvocationRequest, InvocationResult};
use serde_json::Value;

use super::{account, contract_handle};
use crate::{output::Output, CliError};

/// Arguments shared by `view` and `call`
#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Contract: account record name or account id
    pub contract: String,
    /// Method name
    pub method: String,
    /// Method arguments as a JSON object
    #[arg(long, default_value = "{}")]
    pub args: String,
    /// Attribute the invocation to this account (record name or account id)
    #[arg(long = "as", value_name = "ACCOUNT")]
    pub caller: Option<String>,
}

impl InvokeArgs {
    fn request(&self, config: &HarnessConfig) -> Result<InvocationRequest, CliError> {
        let args: Value = serde_json::from_str(&self.args)
            .map_err(|e| CliError::InvalidInput(format!("--args is not JSON: {}", e)))?;
        let mut request = InvocationRequest::new(self.method.as_str())?.with_args(args)?;
        if let Some(caller) = &self.caller {
            request = request.with_caller(account(config, caller)?);
        }
        Ok(request)
    }
}

/// Read-only invocation
pub async fn view(args: InvokeArgs, config: &HarnessConfig, json: bool) -> Result<(), CliError> {
    let handle = contract_handle(config, &args.contract)?;
    let request = args.request(config)?;
    let client = InvocationClient::connect(config)?;
    let result = client.view(&handle, &request).await;
    report(result, json)
}

/// State-mutating invocation
pub async fn call(args: InvokeArgs, config: &HarnessConfig, json: bool) -> Result<(), CliError> {
    let handle = contract_handle(config, &args.contract)?;
    let request = args.request(config)?;
    let client = InvocationClient::connect(config)?;
    let result = client.call(&handle, &request).await;
    report(result, json)
}

fn report(result: InvocationResult, json: bool) -> Result<(), CliError> {
    match result {
        InvocationResult::Success { value } => {
            Output::new(json)
                .field("kind", "Success")
                .message(&render_value(&value))
                .field_value("value", value)
                .print();
            Ok(())
        }
        InvocationResult::Failure { error_kind, detail } => Err(CliError::Invocation {
            kind: error_kind,
            detail,
        }),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "(no return value)".to_string(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
