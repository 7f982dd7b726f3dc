//! HTTP client for the Shodan API.
//!
//! This crate provides [`ShodanClient`], limited to the host search and
//! count endpoints with facet aggregation.
//!
//! ```rust,ignore
//! use cforigin_client::ShodanClient;
//!
//! let client = ShodanClient::new("your-api-key");
//! let results = client
//!     .search()
//!     .query("hostname:example.com")
//!     .facet("ip")
//!     .send()
//!     .await?;
//! ```

mod client;
pub mod api;

pub use client::{ShodanClient, ShodanClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use cforigin_core::{Result, ShodanError};
