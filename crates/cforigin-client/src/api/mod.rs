//! API endpoint modules.

mod search;

pub use search::{CountRequestBuilder, SearchApi, SearchRequestBuilder};
