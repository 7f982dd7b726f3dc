//! CDN provider address blocks and the membership test.
//!
//! The table is plain data. [`AddressTable::cloudflare`] builds it from
//! [`CLOUDFLARE_RANGES`]; [`AddressTable::load`] reads a replacement list
//! from disk when the published ranges move.

use crate::error::CoreError;
use ipnet::IpNet;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;

/// Cloudflare address ranges as published at <https://www.cloudflare.com/ips/>.
pub const CLOUDFLARE_RANGES: &[&str] = &[
    "173.245.48.0/20",
    "103.21.244.0/22",
    "103.22.200.0/22",
    "103.31.4.0/22",
    "141.101.64.0/18",
    "108.162.192.0/18",
    "190.93.240.0/20",
    "188.114.96.0/20",
    "197.234.240.0/22",
    "198.41.128.0/17",
    "162.158.0.0/15",
    "104.16.0.0/13",
    "104.24.0.0/14",
    "172.64.0.0/13",
    "131.0.72.0/22",
    "2400:cb00::/32",
    "2606:4700::/32",
    "2803:f800::/32",
    "2405:b500::/32",
    "2405:8100::/32",
    "2a06:98c0::/29",
    "2c0f:f248::/32",
];

/// A single CIDR block owned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBlock {
    cidr: String,
    net: IpNet,
}

impl AddressBlock {
    /// The block as written in the source table
    #[must_use]
    pub fn cidr(&self) -> &str {
        &self.cidr
    }

    /// The parsed network
    #[must_use]
    pub const fn network(&self) -> &IpNet {
        &self.net
    }

    /// Returns true if `ip` falls inside this block
    #[must_use]
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.net.contains(ip)
    }
}

impl FromStr for AddressBlock {
    type Err = ipnet::AddrParseError;

    /// Parses `a.b.c.d/n` or `x::/n`. A bare address becomes a host block.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let net = match IpNet::from_str(s) {
            Ok(net) => net.trunc(),
            Err(e) => match IpAddr::from_str(s) {
                Ok(ip) => IpNet::from(ip),
                Err(_) => return Err(e),
            },
        };
        Ok(Self { cidr: s.to_string(), net })
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cidr)
    }
}

impl Serialize for AddressBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.cidr)
    }
}

/// Ordered set of provider blocks.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AddressTable {
    blocks: Vec<AddressBlock>,
}

impl AddressTable {
    /// The built-in Cloudflare table
    #[must_use]
    pub fn cloudflare() -> Self {
        let blocks = CLOUDFLARE_RANGES
            .iter()
            .filter_map(|cidr| cidr.parse::<AddressBlock>().ok())
            .collect();
        Self { blocks }
    }

    /// Build a table from CIDR strings, failing on the first bad entry
    pub fn from_cidrs<I, S>(cidrs: I) -> std::result::Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocks = Vec::new();
        for (idx, cidr) in cidrs.into_iter().enumerate() {
            let cidr = cidr.as_ref();
            let block: AddressBlock = cidr.parse().map_err(|_| CoreError::InvalidBlock {
                block: cidr.to_string(),
                line: idx + 1,
            })?;
            blocks.push(block);
        }
        if blocks.is_empty() {
            return Err(CoreError::EmptyTable);
        }
        Ok(Self { blocks })
    }

    /// Parse a newline separated list. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> std::result::Result<Self, CoreError> {
        let mut blocks = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let block: AddressBlock = line.parse().map_err(|_| CoreError::InvalidBlock {
                block: line.to_string(),
                line: idx + 1,
            })?;
            blocks.push(block);
        }
        if blocks.is_empty() {
            return Err(CoreError::EmptyTable);
        }
        Ok(Self { blocks })
    }

    /// Read a table file in the format accepted by [`AddressTable::parse`]
    pub fn load(path: &Path) -> std::result::Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Blocks in table order
    #[must_use]
    pub fn blocks(&self) -> &[AddressBlock] {
        &self.blocks
    }

    /// Number of blocks
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the table holds no blocks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// First block containing `ip`, in table order.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are matched as IPv4.
    #[must_use]
    pub fn find(&self, ip: &IpAddr) -> Option<&AddressBlock> {
        let ip = ip.to_canonical();
        self.blocks.iter().find(|b| b.contains(&ip))
    }

    /// Like [`AddressTable::find`], for an unparsed address.
    ///
    /// Unparseable input is simply not a member.
    #[must_use]
    pub fn find_str(&self, ip: &str) -> Option<&AddressBlock> {
        ip.trim().parse::<IpAddr>().ok().and_then(|ip| self.find(&ip))
    }

    /// Membership test for a parsed address
    #[must_use]
    pub fn contains_ip(&self, ip: &IpAddr) -> bool {
        self.find(ip).is_some()
    }

    /// Membership test for an address string
    #[must_use]
    pub fn contains(&self, ip: &str) -> bool {
        self.find_str(ip).is_some()
    }
}

impl Default for AddressTable {
    fn default() -> Self {
        Self::cloudflare()
    }
}
