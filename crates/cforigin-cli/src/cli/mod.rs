//! CLI argument parsing and the top-level run loop.

pub mod args;

use anyhow::Result;
use args::Cli;
use cforigin_client::ShodanClient;
use cforigin_core::AddressTable;
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::CliError;
use crate::investigate::{investigate, DiscoveryOptions};
use crate::output::{render, OutputFormat};
use crate::resolve::{HostResolver, SystemResolver};

/// Environment variable holding the Shodan API key.
pub const API_KEY_ENV: &str = "SHODAN_API";

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let env_key = std::env::var(API_KEY_ENV).ok();

    // Unlocked handles: each write takes the lock, so none is held across an await.
    run_with(
        cli,
        config,
        env_key,
        &SystemResolver,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

/// Run with explicit inputs; `run` wires these to the process environment.
pub async fn run_with<R>(
    cli: Cli,
    config: Config,
    env_key: Option<String>,
    resolver: &R,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()>
where
    R: HostResolver + ?Sized,
{
    if cli.no_color {
        colored::control::set_override(false);
    }

    // The key is checked before any DNS traffic.
    let api_key = resolve_api_key(cli.api_key.clone(), env_key, config.api_key.clone())?;

    let table = load_table(&cli, &config)?;
    debug!(blocks = table.len(), "address table loaded");

    let timeout = cli
        .timeout
        .or(config.timeout_secs)
        .map_or(cforigin_client::DEFAULT_TIMEOUT, Duration::from_secs);
    let client = ShodanClient::builder(api_key)
        .base_url(cli.base_url.clone())
        .timeout(timeout)
        .build();

    let options = DiscoveryOptions {
        facet_limit: cli.facet_limit,
        no_credits: cli.no_credits,
    };

    let report = investigate(resolver, &client, &table, &cli.host, &options).await?;

    let format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);
    render(&report, format, out, err)?;
    out.flush()?;

    Ok(())
}

/// Pick the API key: flag, then environment, then config. Empty values count as unset.
pub fn resolve_api_key(
    flag: Option<String>,
    env: Option<String>,
    config: Option<String>,
) -> Result<String, CliError> {
    [flag, env, config]
        .into_iter()
        .flatten()
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
        .ok_or(CliError::MissingCredential)
}

/// The address table from `--ranges`, the config file, or the built-in list.
fn load_table(cli: &Cli, config: &Config) -> Result<AddressTable, CliError> {
    match cli.ranges.as_ref().or(config.ranges_file.as_ref()) {
        Some(path) => {
            debug!(path = %path.display(), "loading address table");
            Ok(AddressTable::load(path)?)
        }
        None => Ok(AddressTable::cloudflare()),
    }
}

/// Exit status for an error returned by [`run`].
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>().map_or(2, CliError::exit_code)
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("cforigin_cli=debug,cforigin_client=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
