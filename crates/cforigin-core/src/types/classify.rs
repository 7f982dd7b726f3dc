use super::FacetValue;
use crate::AddressTable;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr};

/// A DNS answer tagged with its provider classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIp {
    /// Address returned by the resolver
    pub ip: IpAddr,

    /// Whether the address sits inside a provider block
    pub is_provider: bool,

    /// The block that matched, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

impl ResolvedIp {
    /// Classify a single address against `table`
    #[must_use]
    pub fn classify(ip: IpAddr, table: &AddressTable) -> Self {
        let block = table.find(&ip).map(|b| b.cidr().to_string());
        Self {
            ip,
            is_provider: block.is_some(),
            block,
        }
    }
}

/// Classification of every address a hostname resolved to
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    /// Addresses in resolver order
    pub addresses: Vec<ResolvedIp>,
}

impl Classification {
    /// Classify each address in order
    pub fn new<I>(addresses: I, table: &AddressTable) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        Self {
            addresses: addresses
                .into_iter()
                .map(|ip| ResolvedIp::classify(ip, table))
                .collect(),
        }
    }

    /// At least one address is provider-owned
    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.addresses.iter().any(|a| a.is_provider)
    }

    /// At least one address is not provider-owned
    #[must_use]
    pub fn has_non_provider(&self) -> bool {
        self.addresses.iter().any(|a| !a.is_provider)
    }

    /// Both provider and non-provider addresses were returned
    #[must_use]
    pub fn is_mixed(&self) -> bool {
        self.has_provider() && self.has_non_provider()
    }

    /// Provider-owned addresses
    pub fn provider(&self) -> impl Iterator<Item = &ResolvedIp> {
        self.addresses.iter().filter(|a| a.is_provider)
    }

    /// Addresses outside every provider block
    pub fn non_provider(&self) -> impl Iterator<Item = &ResolvedIp> {
        self.addresses.iter().filter(|a| !a.is_provider)
    }

    /// Returns true if nothing was resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// One IP value from the search facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Facet value as returned by the API
    pub value: String,

    /// Parsed address, `None` when the value is not an IP
    pub ip: Option<IpAddr>,

    /// Number of banners carrying this value
    pub count: u64,

    /// Whether the address sits inside a provider block
    pub is_provider: bool,

    /// The block that matched, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

impl Candidate {
    /// Classify a facet value; decimal integers are read as IPv4 addresses
    #[must_use]
    pub fn classify(value: &str, count: u64, table: &AddressTable) -> Self {
        let value = value.trim();
        let ip = value
            .parse::<IpAddr>()
            .ok()
            .or_else(|| value.parse::<u32>().ok().map(|n| IpAddr::V4(Ipv4Addr::from(n))));
        let block = ip.and_then(|ip| table.find(&ip)).map(|b| b.cidr().to_string());
        Self {
            value: value.to_string(),
            ip,
            count,
            is_provider: block.is_some(),
            block,
        }
    }

    /// True for a parseable address outside every provider block
    #[must_use]
    pub const fn is_origin(&self) -> bool {
        self.ip.is_some() && !self.is_provider
    }
}

/// Classified output of the origin-discovery query
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    /// The query that was sent
    pub query: String,

    /// Total banners matching the query
    pub total: u64,

    /// Every facet value, in API order
    pub candidates: Vec<Candidate>,
}

impl QueryResult {
    /// Classify the values of an `ip` facet
    #[must_use]
    pub fn from_facet(
        query: impl Into<String>,
        total: u64,
        values: &[FacetValue],
        table: &AddressTable,
    ) -> Self {
        let candidates = values
            .iter()
            .filter_map(|fv| fv.to_text().map(|text| Candidate::classify(&text, fv.count, table)))
            .collect();
        Self {
            query: query.into(),
            total,
            candidates,
        }
    }

    /// Candidate origin hosts: values that are addresses outside the provider
    pub fn origins(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(|c| c.is_origin())
    }

    /// Returns true if at least one candidate origin was found
    #[must_use]
    pub fn has_origins(&self) -> bool {
        self.origins().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn facet(value: serde_json::Value, count: u64) -> FacetValue {
        FacetValue { value, count }
    }

    #[test]
    fn test_provider_only() {
        let table = AddressTable::cloudflare();
        let c = Classification::new([ip("104.16.1.1")], &table);
        assert!(c.has_provider());
        assert!(!c.has_non_provider());
        assert!(!c.is_mixed());
        assert_eq!(c.addresses[0].block.as_deref(), Some("104.16.0.0/13"));
    }

    #[test]
    fn test_non_provider_only() {
        let table = AddressTable::cloudflare();
        let c = Classification::new([ip("93.184.216.34")], &table);
        assert!(!c.has_provider());
        assert!(c.has_non_provider());
        assert!(c.addresses[0].block.is_none());
    }

    #[test]
    fn test_mixed_response() {
        let table = AddressTable::cloudflare();
        let c = Classification::new([ip("104.16.1.1"), ip("93.184.216.34")], &table);
        assert!(c.is_mixed());
        assert_eq!(c.provider().count(), 1);
        assert_eq!(c.non_provider().next().map(|a| a.ip), Some(ip("93.184.216.34")));
    }

    #[test]
    fn test_empty_classification() {
        let c = Classification::new(Vec::<IpAddr>::new(), &AddressTable::cloudflare());
        assert!(c.is_empty());
        assert!(!c.is_mixed());
    }

    #[test]
    fn test_query_result_filters_provider_values() {
        let table = AddressTable::cloudflare();
        let values = vec![
            facet("203.0.113.9".into(), 12),
            facet("104.16.1.1".into(), 3),
            facet("2606:4700::6810:85e5".into(), 2),
            facet("2001:db8::1".into(), 1),
        ];
        let result = QueryResult::from_facet("hostname:example.com", 18, &values, &table);
        let origins: Vec<_> = result.origins().map(|c| c.value.as_str()).collect();
        assert_eq!(origins, ["203.0.113.9", "2001:db8::1"]);
        assert_eq!(result.candidates.len(), 4);
        assert!(result.has_origins());
    }

    #[test]
    fn test_numeric_facet_values() {
        let table = AddressTable::cloudflare();
        // 203.0.113.9 and 104.16.1.1 as integers
        let values = vec![facet(3_405_803_785_u64.into(), 1), facet(1_745_879_297_u64.into(), 1)];
        let result = QueryResult::from_facet("hostname:example.com", 2, &values, &table);
        assert_eq!(result.candidates[0].ip, Some(ip("203.0.113.9")));
        assert!(result.candidates[0].is_origin());
        assert!(result.candidates[1].is_provider);
        assert_eq!(result.candidates[1].block.as_deref(), Some("104.16.0.0/13"));
    }

    #[test]
    fn test_ipv4_mapped_facet_value_is_provider() {
        let table = AddressTable::cloudflare();
        let c = Candidate::classify("::ffff:104.16.1.1", 2, &table);
        assert!(c.is_provider);
        assert!(!c.is_origin());
        let r = ResolvedIp::classify(ip("::ffff:104.16.1.1"), &table);
        assert_eq!(r.block.as_deref(), Some("104.16.0.0/13"));
    }

    #[test]
    fn test_unparseable_facet_value_is_not_origin() {
        let table = AddressTable::cloudflare();
        let values = vec![facet("not-an-ip".into(), 4), facet(serde_json::Value::Null, 1)];
        let result = QueryResult::from_facet("hostname:example.com", 5, &values, &table);
        assert_eq!(result.candidates.len(), 1);
        assert!(!result.candidates[0].is_provider);
        assert!(!result.has_origins());
    }
}
