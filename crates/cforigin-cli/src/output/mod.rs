//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Deserialize;
use std::io::Write;

use crate::investigate::{Discovery, Report};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable text with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
}

/// Write `report` to `out`. A failed Shodan query is also reported on `err`.
pub fn render(
    report: &Report,
    format: OutputFormat,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    if let Discovery::Failed { error, .. } = &report.discovery {
        writeln!(err, "{} Shodan query failed: {}", "warning:".yellow().bold(), error)?;
    }

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        }
        OutputFormat::Yaml => {
            write!(out, "{}", serde_yaml::to_string(report)?)?;
        }
        OutputFormat::Csv => render_csv(report, out)?,
        OutputFormat::Pretty => render_pretty(report, out)?,
    }

    Ok(())
}

fn render_pretty(report: &Report, out: &mut dyn Write) -> Result<()> {
    for addr in report.addresses.iter().filter(|a| a.is_provider) {
        writeln!(
            out,
            "'{}' has IP '{}' which is part of a Cloudflare block ({})",
            report.hostname.cyan(),
            addr.ip.to_string().yellow(),
            addr.block.as_deref().unwrap_or("?").dimmed()
        )?;
    }

    if report.mixed {
        writeln!(
            out,
            "{}",
            "Mixed CF and non-CF response. Real host may be in DNS?".magenta()
        )?;
        for addr in report.addresses.iter().filter(|a| !a.is_provider) {
            writeln!(out, "  non-Cloudflare DNS record: {}", addr.ip.to_string().green())?;
        }
    }

    match &report.discovery {
        Discovery::Skipped => {
            writeln!(out, "Does not appear to be a host using Cloudflare")?;
        }
        Discovery::Completed(result) => {
            let origins: Vec<_> = result.origins().collect();
            for candidate in &origins {
                writeln!(
                    out,
                    "Found \"real\" (non-Cloudflare) host: {} {}",
                    candidate.value.green().bold(),
                    format!("({} banners)", candidate.count).dimmed()
                )?;
            }
            if origins.is_empty() {
                writeln!(
                    out,
                    "{} {}",
                    "No non-Cloudflare hosts found for".dimmed(),
                    result.query
                )?;
            }
        }
        // Already reported on the error stream.
        Discovery::Failed { .. } => {}
    }

    Ok(())
}

fn render_csv(report: &Report, out: &mut dyn Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["kind", "ip", "provider", "block"])?;
    for addr in &report.addresses {
        let ip = addr.ip.to_string();
        let provider = addr.is_provider.to_string();
        wtr.write_record([
            "resolved",
            ip.as_str(),
            provider.as_str(),
            addr.block.as_deref().unwrap_or(""),
        ])?;
    }
    if let Discovery::Completed(result) = &report.discovery {
        for candidate in &result.candidates {
            let provider = candidate.is_provider.to_string();
            wtr.write_record([
                "candidate",
                candidate.value.as_str(),
                provider.as_str(),
                candidate.block.as_deref().unwrap_or(""),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforigin_core::{AddressTable, Classification, FacetValue, QueryResult};
    use chrono::Utc;

    fn report(ips: &[&str], discovery: Discovery) -> Report {
        let table = AddressTable::cloudflare();
        let classification =
            Classification::new(ips.iter().map(|s| s.parse().unwrap()), &table);
        Report {
            hostname: "example.com".into(),
            checked_at: Utc::now(),
            mixed: classification.is_mixed(),
            addresses: classification.addresses,
            discovery,
        }
    }

    fn completed(values: &[&str]) -> Discovery {
        let facets: Vec<FacetValue> = values
            .iter()
            .map(|v| FacetValue { value: (*v).into(), count: 1 })
            .collect();
        Discovery::Completed(QueryResult::from_facet(
            "hostname:example.com",
            facets.len() as u64,
            &facets,
            &AddressTable::cloudflare(),
        ))
    }

    fn render_to_strings(report: &Report, format: OutputFormat) -> (String, String) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let mut err = Vec::new();
        render(report, format, &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_pretty_provider_and_origin() {
        let r = report(&["104.16.1.1"], completed(&["203.0.113.9", "104.16.2.2"]));
        let (out, err) = render_to_strings(&r, OutputFormat::Pretty);
        assert!(out.contains("'example.com' has IP '104.16.1.1' which is part of a Cloudflare block"));
        assert!(out.contains("Found \"real\" (non-Cloudflare) host: 203.0.113.9"));
        assert!(!out.contains("104.16.2.2"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_pretty_not_behind_cloudflare() {
        let r = report(&["93.184.216.34"], Discovery::Skipped);
        let (out, _) = render_to_strings(&r, OutputFormat::Pretty);
        assert!(out.contains("Does not appear to be a host using Cloudflare"));
        assert!(!out.contains("part of a Cloudflare block"));
    }

    #[test]
    fn test_pretty_mixed_notice() {
        let r = report(&["104.16.1.1", "93.184.216.34"], completed(&[]));
        let (out, _) = render_to_strings(&r, OutputFormat::Pretty);
        assert!(out.contains("Mixed CF and non-CF response"));
        assert!(out.contains("non-Cloudflare DNS record: 93.184.216.34"));
        assert!(out.contains("No non-Cloudflare hosts found for hostname:example.com"));
    }

    #[test]
    fn test_failed_discovery_goes_to_err() {
        let r = report(
            &["104.16.1.1"],
            Discovery::Failed {
                query: "hostname:example.com".into(),
                error: "authentication failed: invalid API key".into(),
            },
        );
        let (out, err) = render_to_strings(&r, OutputFormat::Pretty);
        assert!(err.contains("Shodan query failed: authentication failed"));
        assert!(!out.contains("authentication failed"));
    }

    #[test]
    fn test_csv_rows() {
        let r = report(&["104.16.1.1"], completed(&["198.51.100.7"]));
        let (out, _) = render_to_strings(&r, OutputFormat::Csv);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "kind,ip,provider,block");
        assert_eq!(lines[1], "resolved,104.16.1.1,true,104.16.0.0/13");
        assert_eq!(lines[2], "candidate,198.51.100.7,false,");
    }

    #[test]
    fn test_csv_quotes_api_values() {
        let r = report(&["104.16.1.1"], completed(&["evil,\"x\"", "104.16.2.2"]));
        let (out, _) = render_to_strings(&r, OutputFormat::Csv);
        let mut rdr = csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|row| row.unwrap()).collect();
        assert!(rows.iter().all(|row| row.len() == 4));
        assert_eq!(&rows[1][1], "evil,\"x\"");
        assert_eq!(&rows[2][3], "104.16.0.0/13");
    }

    #[test]
    fn test_json_report() {
        let r = report(&["104.16.1.1"], completed(&["198.51.100.7"]));
        let (out, _) = render_to_strings(&r, OutputFormat::Json);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["hostname"], "example.com");
        assert_eq!(v["discovery"]["status"], "completed");
        assert_eq!(v["discovery"]["candidates"][0]["value"], "198.51.100.7");
        assert_eq!(v["addresses"][0]["block"], "104.16.0.0/13");
    }
}
