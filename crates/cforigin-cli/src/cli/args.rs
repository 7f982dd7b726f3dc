//! Command-line argument definitions using clap.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Find the origin server behind a Cloudflare-fronted hostname.
///
/// Resolves the hostname, checks each address against Cloudflare's
/// published ranges and, if any match, asks Shodan which other addresses
/// have served that hostname.
///
/// Get your API key at: https://account.shodan.io
#[derive(Parser, Debug)]
#[command(name = "cforigin")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Hostname to investigate
    #[arg(short = 'h', long = "host", value_name = "HOSTNAME")]
    pub host: String,

    /// Shodan API key (or set SHODAN_API env var)
    #[arg(short = 's', long = "shodan-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// File of CIDR blocks to use instead of the built-in Cloudflare list
    #[arg(long, value_name = "FILE")]
    pub ranges: Option<PathBuf>,

    /// Ask Shodan for at most this many IP facet values
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub facet_limit: Option<u32>,

    /// Use the count endpoint, which does not consume query credits
    #[arg(long)]
    pub no_credits: bool,

    /// HTTP timeout for the Shodan query, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file (default: platform config dir, cforigin/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Shodan API base URL
    #[arg(long, hide = true, default_value = cforigin_client::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Increase verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}
