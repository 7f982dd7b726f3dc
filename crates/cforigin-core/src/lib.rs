//! Core types for cforigin.
//!
//! This crate provides the pieces the rest of the workspace builds on:
//!
//! - **Address table**: the CDN provider's CIDR blocks as data, see [`AddressTable`]
//! - **Classification**: [`ResolvedIp`], [`Classification`] and [`QueryResult`]
//! - **Search types**: strongly-typed Shodan search/count responses
//! - **Errors**: [`CoreError`] for table loading, [`ShodanError`] for the API
//!
//! # Example
//!
//! ```rust
//! use cforigin_core::AddressTable;
//!
//! let table = AddressTable::cloudflare();
//! assert!(table.contains("104.16.1.1"));
//! assert!(!table.contains("8.8.8.8"));
//! assert!(!table.contains("not-an-ip"));
//! ```

mod blocks;
mod error;
pub mod types;

pub use blocks::{AddressBlock, AddressTable, CLOUDFLARE_RANGES};
pub use error::{CoreError, Result, ShodanError};
pub use types::*;
