//! # cforigin-cli
//!
//! Resolve a hostname, check its addresses against Cloudflare's published
//! ranges and, when it sits behind Cloudflare, ask Shodan which other
//! addresses have served that hostname.
//!
//! ## Flow
//!
//! 1. Resolve the API key (`-s`, then `SHODAN_API`, then the config file)
//! 2. Resolve the hostname and classify every A/AAAA answer
//! 3. If any answer is a Cloudflare address, run a `hostname:` search with
//!    an `ip` facet and report the non-Cloudflare values as candidate origins
//!
//! ## Exit codes
//!
//! - `0`: finished, including when the Shodan query itself failed
//! - `1`: the hostname could not be resolved
//! - `2`: missing API key, bad arguments or bad configuration

pub mod cli;
pub mod config;
pub mod error;
pub mod investigate;
pub mod output;
pub mod resolve;

pub use cli::{exit_code, run, run_with};
pub use error::CliError;
