//! Fetches search results from the caching proxy.

use crate::tvmaze::{SearchMatch, parse_json_with_context};
use anyhow::Context;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Error fetching TV shows: {status}")]
    Status { status: reqwest::StatusCode },
    #[error("Request to search proxy failed")]
    Network(#[from] reqwest::Error),
    #[error("Failed to parse search results")]
    Parse(#[source] anyhow::Error),
}

#[derive(Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    search_url: Url,
}

impl ProxyClient {
    pub fn new(api_root: &str) -> anyhow::Result<Self> {
        let root = Url::parse(api_root).context("Invalid search proxy URL")?;
        let search_url = root
            .join("search/shows")
            .context("Search proxy URL cannot be a base")?;
        Ok(Self {
            http: reqwest::Client::new(),
            search_url,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchMatch>, FetchError> {
        let response = self
            .http
            .get(self.search_url.clone())
            .query(&[("q", query)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }
        let body = response.text().await?;
        parse_json_with_context(&body).map_err(FetchError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_is_resolved_against_the_root() {
        let client = ProxyClient::new("http://localhost:3000").unwrap();
        assert_eq!(client.search_url().as_str(), "http://localhost:3000/search/shows");
    }
}
