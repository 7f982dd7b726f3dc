//! Error taxonomy for the binary and the exit codes it maps to.

use cforigin_core::CoreError;
use thiserror::Error;

/// Failures that end the run with a specific exit status
#[derive(Error, Debug)]
pub enum CliError {
    /// No API key from flag, environment or config file
    #[error(
        "Shodan API key required.\n\n\
         Set it with one of:\n  \
         1. -s/--shodan-key <KEY>\n  \
         2. SHODAN_API environment variable\n  \
         3. api_key in the config file\n\n\
         Get your key at: https://account.shodan.io"
    )]
    MissingCredential,

    /// The hostname could not be resolved
    #[error("could not get IPs for {host}: {reason}")]
    Resolution {
        /// Hostname that was looked up
        host: String,
        /// Resolver error text
        reason: String,
    },

    /// The address table could not be loaded
    #[error(transparent)]
    Table(#[from] CoreError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Process exit status for this error
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Resolution { .. } => 1,
            Self::MissingCredential | Self::Table(_) | Self::Config(_) => 2,
        }
    }
}
