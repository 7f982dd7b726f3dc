//! Search API endpoints.

use crate::ShodanClient;
use cforigin_core::{HostCount, Result, SearchResults};
use serde::de::DeserializeOwned;

/// Search API endpoints
pub struct SearchApi<'a> {
    client: &'a ShodanClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) const fn new(client: &'a ShodanClient) -> Self {
        Self { client }
    }

    /// Search Shodan with a query string (consumes a query credit)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let results = client.search().query("hostname:example.com").facet("ip").send().await?;
    /// for fv in results.facet("ip") {
    ///     println!("{} ({})", fv.value, fv.count);
    /// }
    /// ```
    #[must_use]
    pub fn query(&self, query: impl Into<String>) -> SearchRequestBuilder<'a> {
        SearchRequestBuilder::new(self.client, query.into())
    }

    /// Get count of results without consuming query credits
    #[must_use]
    pub fn count(&self, query: impl Into<String>) -> CountRequestBuilder<'a> {
        CountRequestBuilder::new(self.client, query.into())
    }
}

/// Builder for search requests
pub struct SearchRequestBuilder<'a> {
    client: &'a ShodanClient,
    query: String,
    facets: Vec<String>,
}

impl<'a> SearchRequestBuilder<'a> {
    const fn new(client: &'a ShodanClient, query: String) -> Self {
        Self {
            client,
            query,
            facets: Vec::new(),
        }
    }

    /// Add a facet to aggregate results, e.g. `ip` or `ip:100`
    #[must_use]
    pub fn facet(mut self, facet: impl Into<String>) -> Self {
        self.facets.push(facet.into());
        self
    }

    /// Execute the search
    pub async fn send(self) -> Result<SearchResults> {
        faceted_get(self.client, "/shodan/host/search", &self.query, &self.facets).await
    }
}

/// Builder for count requests
pub struct CountRequestBuilder<'a> {
    client: &'a ShodanClient,
    query: String,
    facets: Vec<String>,
}

impl<'a> CountRequestBuilder<'a> {
    const fn new(client: &'a ShodanClient, query: String) -> Self {
        Self {
            client,
            query,
            facets: Vec::new(),
        }
    }

    /// Add a facet to aggregate results
    #[must_use]
    pub fn facet(mut self, facet: impl Into<String>) -> Self {
        self.facets.push(facet.into());
        self
    }

    /// Execute the count request
    pub async fn send(self) -> Result<HostCount> {
        faceted_get(self.client, "/shodan/host/count", &self.query, &self.facets).await
    }
}

/// GET `path` with `query` and, when any were added, a comma-joined `facets` parameter
async fn faceted_get<T: DeserializeOwned>(
    client: &ShodanClient,
    path: &str,
    query: &str,
    facets: &[String],
) -> Result<T> {
    let facets = facets.join(",");
    let mut params = vec![("query", query)];
    if !facets.is_empty() {
        params.push(("facets", facets.as_str()));
    }

    client.get_with_query(path, &params).await
}
