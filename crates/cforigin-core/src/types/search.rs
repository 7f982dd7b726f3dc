use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Search results from /shodan/host/search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching banners/services
    #[serde(default)]
    pub matches: Vec<SearchMatch>,

    /// Total number of results
    #[serde(default)]
    pub total: u64,

    /// Facet aggregations if requested
    #[serde(default)]
    pub facets: HashMap<String, Vec<FacetValue>>,
}

impl SearchResults {
    /// Values of a single facet, empty if the facet was not returned
    #[must_use]
    pub fn facet(&self, name: &str) -> &[FacetValue] {
        self.facets.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Individual match in search results.
///
/// Only the fields the origin report cares about are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    /// IP address as string
    pub ip_str: String,

    /// Port number
    #[serde(default)]
    pub port: u16,

    /// Hostnames associated with this IP
    #[serde(default)]
    pub hostnames: Vec<String>,

    /// Organization that owns the IP
    #[serde(default)]
    pub org: Option<String>,
}

/// Facet aggregation value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetValue {
    /// The value being aggregated
    pub value: serde_json::Value,

    /// Count of matches with this value
    #[serde(default)]
    pub count: u64,
}

impl FacetValue {
    /// Try to get the value as a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// The value rendered as text; numbers are stringified, other shapes yield `None`
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match &self.value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Host count result from /shodan/host/count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostCount {
    /// Total number of matching results
    #[serde(default)]
    pub total: u64,

    /// Facet aggregations if requested
    #[serde(default)]
    pub facets: HashMap<String, Vec<FacetValue>>,
}

impl HostCount {
    /// Values of a single facet, empty if the facet was not returned
    #[must_use]
    pub fn facet(&self, name: &str) -> &[FacetValue] {
        self.facets.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

impl From<SearchResults> for HostCount {
    fn from(results: SearchResults) -> Self {
        Self {
            total: results.total,
            facets: results.facets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_facet_response() {
        let body = r#"{
            "matches": [{"ip_str": "203.0.113.9", "port": 443, "hostnames": ["example.com"]}],
            "total": 7,
            "facets": {"ip": [{"value": "203.0.113.9", "count": 5}, {"value": "104.16.1.1", "count": 2}]}
        }"#;
        let results: SearchResults = serde_json::from_str(body).unwrap();
        assert_eq!(results.matches[0].ip_str, "203.0.113.9");
        assert_eq!(results.total, 7);
        let ips: Vec<_> = results.facet("ip").iter().filter_map(FacetValue::as_str).collect();
        assert_eq!(ips, ["203.0.113.9", "104.16.1.1"]);
        assert!(results.facet("port").is_empty());
    }

    #[test]
    fn test_count_without_facets() {
        let count: HostCount = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert_eq!(count.total, 0);
        assert!(count.facet("ip").is_empty());
    }

    #[test]
    fn test_facet_value_text() {
        let num: FacetValue = serde_json::from_str(r#"{"value": 3405803785, "count": 1}"#).unwrap();
        assert_eq!(num.to_text().as_deref(), Some("3405803785"));
        let obj: FacetValue = serde_json::from_str(r#"{"value": {"a": 1}, "count": 1}"#).unwrap();
        assert_eq!(obj.to_text(), None);
    }
}
