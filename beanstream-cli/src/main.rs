//! Command-line access to the Beanstream gateway.
//!
//! Credentials come from a TOML file (`--config` or `BEANSTREAM_CONFIG`) or,
//! failing that, from the `BEANSTREAM_*` environment variables. Results are
//! printed to stdout as pretty JSON; errors and logs go to stderr.

mod observability;

use std::{path::PathBuf, process::ExitCode};

use beanstream::{
    BeanstreamError, Gateway, GatewayConfig,
    domain::{AdjustRequest, Criteria, QueryField},
};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::observability::{LogFormat, init_observability};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Beanstream gateway client.
#[derive(Parser, Debug)]
#[command(name = "beanstream", version, about = "Beanstream payment gateway client")]
struct Cli {
    /// TOML configuration file. Falls back to `BEANSTREAM_*` variables when absent.
    #[arg(long, short, env = "BEANSTREAM_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Overrides the gateway API root, e.g. a sandbox.
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a transaction.
    Get {
        /// Transaction id.
        trans_id: String,
    },
    /// Void a transaction.
    Void {
        /// Transaction id.
        trans_id: String,
        /// Amount to void.
        #[arg(long)]
        amount: Decimal,
        /// Order number of the void.
        #[arg(long)]
        order_number: Option<String>,
    },
    /// Return funds for a settled transaction.
    Return {
        /// Transaction id.
        trans_id: String,
        /// Amount to return.
        #[arg(long)]
        amount: Decimal,
        /// Order number of the return.
        #[arg(long)]
        order_number: Option<String>,
    },
    /// Complete a pre-authorization.
    Complete {
        /// Pre-authorization transaction id.
        trans_id: String,
        /// Amount to capture.
        #[arg(long)]
        amount: Decimal,
    },
    /// Fetch a payment profile.
    Profile {
        /// Profile customer code.
        profile_id: String,
    },
    /// Delete a payment profile.
    DeleteProfile {
        /// Profile customer code.
        profile_id: String,
    },
    /// List the cards stored on a profile.
    Cards {
        /// Profile customer code.
        profile_id: String,
    },
    /// Search transactions.
    Search {
        /// Window start, e.g. `2026-01-01T00:00:00`.
        #[arg(long)]
        start: NaiveDateTime,
        /// Window end.
        #[arg(long)]
        end: NaiveDateTime,
        /// First row, 1-based.
        #[arg(long, default_value = "1")]
        start_row: u32,
        /// Last row, inclusive.
        #[arg(long, default_value = "100")]
        end_row: u32,
        /// Condition as `field:operator:value`, e.g. `trans_id:>=:10000000`.
        #[arg(long = "criteria", value_parser = parse_criteria)]
        criteria: Vec<Criteria>,
    },
}

fn parse_criteria(s: &str) -> Result<Criteria, String> {
    let mut parts = s.splitn(3, ':');
    let (Some(field), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err("expected field:operator:value".to_owned());
    };
    let field: QueryField = field.parse().map_err(|e: BeanstreamError| e.to_string())?;
    let operator = operator.parse().map_err(|e: BeanstreamError| e.to_string())?;
    Ok(Criteria::new(field, operator, value))
}

fn load_config(cli: &Cli) -> beanstream::Result<GatewayConfig> {
    let config = match &cli.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::from_env()?,
    };
    Ok(match &cli.base_url {
        Some(url) => config.with_base_url(url.clone()),
        None => config,
    })
}

fn adjustment(amount: Decimal, order_number: Option<String>) -> AdjustRequest {
    let request = AdjustRequest::new(amount);
    match order_number {
        Some(order_number) => request.with_order_number(order_number),
        None => request,
    }
}

async fn run(cli: Cli) -> CliResult<Value> {
    let gateway = Gateway::new(load_config(&cli)?)?;
    debug!(command = ?cli.command, "running");

    let output = match cli.command {
        Command::Get { trans_id } => {
            serde_json::to_value(gateway.payments().get_transaction(&trans_id).await?)?
        }
        Command::Void { trans_id, amount, order_number } => serde_json::to_value(
            gateway.payments().void(&trans_id, &adjustment(amount, order_number)).await?,
        )?,
        Command::Return { trans_id, amount, order_number } => serde_json::to_value(
            gateway.payments().return_payment(&trans_id, &adjustment(amount, order_number)).await?,
        )?,
        Command::Complete { trans_id, amount } => {
            serde_json::to_value(gateway.payments().pre_auth_completion(&trans_id, amount).await?)?
        }
        Command::Profile { profile_id } => {
            serde_json::to_value(gateway.profiles().get_profile(&profile_id).await?)?
        }
        Command::DeleteProfile { profile_id } => {
            serde_json::to_value(gateway.profiles().delete_profile(&profile_id).await?)?
        }
        Command::Cards { profile_id } => {
            serde_json::to_value(gateway.profiles().get_cards(&profile_id).await?)?
        }
        Command::Search { start, end, start_row, end_row, criteria } => serde_json::to_value(
            gateway.reporting().query(start, end, start_row, end_row, criteria).await?,
        )?,
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_observability(LogFormat::from_env());
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            match e.downcast_ref::<BeanstreamError>() {
                Some(gateway_error) => {
                    eprintln!("error ({:?}): {gateway_error}", gateway_error.kind());
                    if let Some(api) = gateway_error.api_error() {
                        for detail in &api.details {
                            eprintln!("  {}: {}", detail.field, detail.message);
                        }
                    }
                }
                None => eprintln!("error: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}
