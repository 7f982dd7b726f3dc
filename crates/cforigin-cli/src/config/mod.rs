//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration, read from `config.toml`.
///
/// Every field is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Shodan API key.
    pub api_key: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Address table to use instead of the built-in Cloudflare list.
    pub ranges_file: Option<PathBuf>,

    /// HTTP timeout for the Shodan query, in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the default config file path, `None` when there is no home directory.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("io", "cforigin", "cforigin")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::read(p),
            None => Self::load_default(Self::path()),
        }
    }

    fn load_default(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::read(&p),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            api_key = "abc123"
            output_format = "json"
            ranges_file = "/etc/cforigin/ranges.txt"
            timeout_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.output_format, Some(OutputFormat::Json));
        assert_eq!(config.ranges_file, Some(PathBuf::from("/etc/cforigin/ranges.txt")));
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.api_key.is_none());
        assert!(config.output_format.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("apikey = \"typo\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"from-file\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_default_location_is_optional() {
        let config = Config::load_default(None).unwrap();
        assert!(config.api_key.is_none());
        let missing = Config::load_default(Some(PathBuf::from("/nonexistent/cforigin.toml")));
        assert!(missing.unwrap().api_key.is_none());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        assert!(Config::load(Some(Path::new("/nonexistent/cforigin.toml"))).is_err());
    }
}
