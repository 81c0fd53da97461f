//! # nearlend-cli
//!
//! Command-line interface for nearlend contracts.
//!
//! ## Usage
//!
//! ```bash
//! # Account records
//! nearlend resolve dtoken
//! nearlend accounts
//!
//! # Invocations
//! nearlend view dtoken get_total_supplies
//! nearlend call dtoken set_total_supplies --args '{"amount": 6}' --as dtoken
//!
//! # Deployment
//! nearlend deploy controller res/controller.wasm
//! nearlend deploy dtoken res/dtoken.wasm --force
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nearlend_sdk::{AccountId, CallerPolicy, SdkError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

use config::Config;
use error::CliError;
use output::Output;

/// nearlend CLI
#[derive(Parser, Debug)]
#[command(name = "nearlend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Contract REST API URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory of account records
    #[arg(long, global = true)]
    accounts_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the address behind an account record
    Resolve {
        /// Record name
        name: String,
    },
    /// List account records
    Accounts,
    /// Read-only contract invocation
    View(commands::invoke::InvokeArgs),
    /// State-mutating contract invocation
    Call(commands::invoke::InvokeArgs),
    /// Install a contract
    Deploy(commands::deploy::DeployArgs),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set REST API URL
        #[arg(long)]
        set_api: Option<String>,
        /// Set accounts directory
        #[arg(long)]
        set_accounts_dir: Option<PathBuf>,
        /// Set default caller: "self" or an account id
        #[arg(long)]
        set_caller: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = run(cli.command, cli.api_url, cli.accounts_dir, cli.json).await;

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "type": e.taxonomy(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    api_url: Option<String>,
    accounts_dir: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let mut config = Config::load()?;

    // Command-line overrides apply to this run only
    if let Some(api_url) = api_url {
        config.harness.api_url = api_url;
    }
    if let Some(accounts_dir) = accounts_dir {
        config.harness.accounts_dir = accounts_dir;
    }

    let harness = &config.harness;
    match command {
        Commands::Resolve { name } => commands::resolve::resolve(harness, &name, json),
        Commands::Accounts => commands::resolve::list(harness, json),
        Commands::View(args) => commands::invoke::view(args, harness, json).await,
        Commands::Call(args) => commands::invoke::call(args, harness, json).await,
        Commands::Deploy(args) => commands::deploy::deploy(args, harness, json).await,
        Commands::Config {
            show,
            set_api,
            set_accounts_dir,
            set_caller,
        } => handle_config(&mut config, show, set_api, set_accounts_dir, set_caller, json),
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_api: Option<String>,
    set_accounts_dir: Option<PathBuf>,
    set_caller: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let caller = set_caller.map(|c| parse_caller(&c)).transpose()?;
    let modified = set_api.is_some() || set_accounts_dir.is_some() || caller.is_some();

    if modified {
        config.update(|file| {
            if let Some(api) = set_api {
                file.api_url = api;
            }
            if let Some(dir) = set_accounts_dir {
                file.accounts_dir = dir;
            }
            if let Some(caller) = caller {
                file.default_caller = caller;
            }
        })?;
        let path = config.save()?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .message(&format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        let harness = &config.harness;
        let caller = match &harness.default_caller {
            CallerPolicy::ContractSelf => "self".to_string(),
            CallerPolicy::Account(account) => account.to_string(),
        };
        Output::new(json)
            .field("api_url", &harness.api_url)
            .field("accounts_dir", &harness.accounts_dir.display().to_string())
            .field("default_caller", &caller)
            .field_u64("attached_gas", harness.attached_gas)
            .field("attached_tokens", &harness.attached_tokens)
            .field_u64("timeout_secs", harness.timeout_secs)
            .message(&format!(
                "API URL: {}\nAccounts dir: {}\nDefault caller: {}\nAttached gas: {}\nAttached tokens: {}\nTimeout: {}s",
                harness.api_url,
                harness.accounts_dir.display(),
                caller,
                harness.attached_gas,
                harness.attached_tokens,
                harness.timeout_secs
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-api/--set-accounts-dir/--set-caller to modify")
            .print();
    }

    Ok(())
}

fn parse_caller(value: &str) -> Result<CallerPolicy, CliError> {
    if value == "self" {
        return Ok(CallerPolicy::ContractSelf);
    }
    let account = AccountId::new(value).map_err(SdkError::from)?;
    Ok(CallerPolicy::Account(account))
}
