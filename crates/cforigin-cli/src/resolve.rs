//! Hostname resolution.

use crate::error::CliError;
use async_trait::async_trait;
use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;

/// Something that turns a hostname into its A/AAAA addresses
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve `hostname`, returning each address once in resolver order
    async fn lookup(&self, hostname: &str) -> Result<Vec<IpAddr>, CliError>;
}

/// Resolver backed by the operating system (`getaddrinfo`)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn lookup(&self, hostname: &str) -> Result<Vec<IpAddr>, CliError> {
        let resolution_error = |reason: String| CliError::Resolution {
            host: hostname.to_string(),
            reason,
        };

        // Port is irrelevant; lookup_host wants a socket address.
        let addrs = lookup_host((hostname, 0))
            .await
            .map_err(|e| resolution_error(e.to_string()))?;

        let ips = unique(addrs.map(|a| a.ip()));
        debug!(hostname, count = ips.len(), "resolved");

        if ips.is_empty() {
            return Err(resolution_error("no A/AAAA records".to_string()));
        }
        Ok(ips)
    }
}

/// One entry per address; getaddrinfo repeats them per socket type.
fn unique(ips: impl Iterator<Item = IpAddr>) -> Vec<IpAddr> {
    let mut out: Vec<IpAddr> = Vec::new();
    for ip in ips {
        if !out.contains(&ip) {
            out.push(ip);
        }
    }
    out
}
