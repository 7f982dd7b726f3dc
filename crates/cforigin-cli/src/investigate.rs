//! The investigation: resolve, classify, and look for origin hosts.

use cforigin_client::ShodanClient;
use cforigin_core::{AddressTable, Classification, QueryResult, ResolvedIp};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::API_KEY_ENV;
use crate::error::CliError;
use crate::resolve::HostResolver;

/// How the origin-discovery query is issued
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Maximum number of facet values to ask for
    pub facet_limit: Option<u32>,

    /// Use the count endpoint, which costs no query credits
    pub no_credits: bool,
}

impl DiscoveryOptions {
    /// The `facets` parameter, e.g. `ip` or `ip:100`
    #[must_use]
    pub fn facet(&self) -> String {
        match self.facet_limit {
            Some(limit) => format!("ip:{limit}"),
            None => "ip".to_string(),
        }
    }
}

/// Outcome of the origin-discovery step
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Discovery {
    /// No Cloudflare address was resolved, so nothing was asked
    Skipped,

    /// Shodan answered
    Completed(QueryResult),

    /// Shodan could not be queried
    Failed {
        /// The query that was attempted
        query: String,
        /// Error text
        error: String,
    },
}

/// Everything one run found out about a hostname
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Hostname that was investigated
    pub hostname: String,

    /// When the investigation ran
    pub checked_at: DateTime<Utc>,

    /// Resolved addresses with their classification
    pub addresses: Vec<ResolvedIp>,

    /// DNS returned both Cloudflare and non-Cloudflare addresses
    pub mixed: bool,

    /// Result of the Shodan lookup
    pub discovery: Discovery,
}

impl Report {
    /// At least one resolved address belongs to Cloudflare
    #[must_use]
    pub fn behind_provider(&self) -> bool {
        self.addresses.iter().any(|a| a.is_provider)
    }

    /// Candidate origin hosts, empty unless discovery completed
    #[must_use]
    pub fn origins(&self) -> Vec<&cforigin_core::Candidate> {
        match &self.discovery {
            Discovery::Completed(result) => result.origins().collect(),
            _ => Vec::new(),
        }
    }
}

/// The Shodan query scoped to one hostname
#[must_use]
pub fn hostname_query(hostname: &str) -> String {
    format!("hostname:{hostname}")
}

/// Resolve and classify `hostname`, then query Shodan if it is behind Cloudflare.
///
/// Only a resolution failure is an error; a failed Shodan query is recorded
/// in [`Report::discovery`].
pub async fn investigate<R>(
    resolver: &R,
    client: &ShodanClient,
    table: &AddressTable,
    hostname: &str,
    options: &DiscoveryOptions,
) -> Result<Report, CliError>
where
    R: HostResolver + ?Sized,
{
    let ips = resolver.lookup(hostname).await?;
    let classification = Classification::new(ips, table);

    for addr in classification.provider() {
        debug!(ip = %addr.ip, block = addr.block.as_deref(), "address inside Cloudflare block");
    }

    let mixed = classification.is_mixed();
    if mixed {
        info!(hostname, "mixed Cloudflare and non-Cloudflare response");
    }

    // One query per run, however many Cloudflare records there are.
    let discovery = if classification.has_provider() {
        let query = hostname_query(hostname);
        match discover(client, table, &query, options).await {
            Ok(result) => Discovery::Completed(result),
            Err(e) => {
                debug!(error = %e, "Shodan query failed");
                let error = if e.is_auth_error() {
                    format!("{e} (check --shodan-key or {API_KEY_ENV})")
                } else {
                    e.to_string()
                };
                Discovery::Failed { query, error }
            }
        }
    } else {
        Discovery::Skipped
    };

    Ok(Report {
        hostname: hostname.to_string(),
        checked_at: Utc::now(),
        addresses: classification.addresses,
        mixed,
        discovery,
    })
}

/// Run the facet query and classify every `ip` value
pub async fn discover(
    client: &ShodanClient,
    table: &AddressTable,
    query: &str,
    options: &DiscoveryOptions,
) -> cforigin_core::Result<QueryResult> {
    let facet = options.facet();
    debug!(query, facet = %facet, count_only = options.no_credits, "querying Shodan");

    let counts = if options.no_credits {
        client.search().count(query).facet(facet).send().await?
    } else {
        client.search().query(query).facet(facet).send().await?.into()
    };

    let result = QueryResult::from_facet(query, counts.total, counts.facet("ip"), table);
    debug!(
        candidates = result.candidates.len(),
        origins = result.origins().count(),
        "classified facet values"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_spec() {
        assert_eq!(DiscoveryOptions::default().facet(), "ip");
        let options = DiscoveryOptions { facet_limit: Some(250), no_credits: false };
        assert_eq!(options.facet(), "ip:250");
    }

    #[test]
    fn test_hostname_query() {
        assert_eq!(hostname_query("www.example.com"), "hostname:www.example.com");
    }

    #[test]
    fn test_skipped_report_serializes_status() {
        let report = Report {
            hostname: "example.com".into(),
            checked_at: Utc::now(),
            addresses: Vec::new(),
            mixed: false,
            discovery: Discovery::Skipped,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["discovery"]["status"], "skipped");
        assert!(report.origins().is_empty());
    }
}
