//! rpc-gateway - multi-provider blockchain JSON-RPC gateway
//!
//! Command-line front end over the provider manager

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rpc_gateway::utils::{LogLevel, init_logging};
use rpc_gateway::{Config, ProviderManager, RpcCall};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "Multi-provider blockchain JSON-RPC gateway")]
struct Cli {
    /// Gateway configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,

    /// Log level, overridden by RUST_LOG
    #[arg(long, env = "GATEWAY_LOG_LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send an arbitrary JSON-RPC call
    Call {
        method: String,
        /// Parameters as a JSON array
        params: Option<String>,
    },
    /// Print the latest block number
    BlockNumber,
    /// Print the current gas price in wei
    GasPrice,
    /// Print an account balance in wei
    Balance {
        address: String,
        #[arg(long)]
        block: Option<String>,
    },
    /// Probe every provider once and print their metrics
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level, cli.json_logs) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_file(&cli.config)
        .await
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if config.providers().is_empty() {
        bail!("no providers configured in {}", cli.config.display());
    }

    let manager = ProviderManager::from_config(config.gateway).await?;
    let result = execute(&manager, cli.command).await;
    manager.destroy().await;
    result
}

async fn execute(manager: &Arc<ProviderManager>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Call { method, params } => {
            let params = parse_params(params.as_deref())?;
            let call = RpcCall::new(method, params);
            debug!(call = %call, "Sending call");
            let value = manager.request(&call).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::BlockNumber => {
            println!("{}", manager.get_block_number().await?);
        }
        Command::GasPrice => {
            println!("{}", manager.get_gas_price().await?);
        }
        Command::Balance { address, block } => {
            println!("{}", manager.get_balance(&address, block.as_deref()).await?);
        }
        Command::Health => {
            let probes: BTreeMap<String, bool> =
                manager.run_health_checks().await.into_iter().collect();
            let metrics: BTreeMap<_, _> = manager.metrics().into_iter().collect();
            let limits: BTreeMap<_, _> = manager.rate_limit_status().into_iter().collect();
            let report = json!({
                "healthy": probes,
                "metrics": metrics,
                "rate_limits": limits,
                "cache": manager.cache_stats(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn parse_params(raw: Option<&str>) -> anyhow::Result<Vec<Value>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(raw).context("params must be valid JSON")? {
        Value::Array(params) => Ok(params),
        other => bail!("params must be a JSON array, got {}", other),
    }
}
