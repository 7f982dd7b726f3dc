//! cforigin - find origin servers hidden behind Cloudflare.

use colored::Colorize;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match cforigin_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(cforigin_cli::exit_code(&err))
        }
    }
}
