//! HTTP client for the upstream show search endpoint.

use crate::tvmaze::errors::TvMazeError;
use crate::utils::{SlowCall, fmt_duration};
use anyhow::Context;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Window over which `UPSTREAM_RATE_LIMIT` requests are allowed (TVMaze: 20 per 10s).
const RATE_WINDOW: Duration = Duration::from_secs(10);

const SLOW_UPSTREAM: Duration = Duration::from_secs(1);

pub struct TvMazeApi {
    http: reqwest::Client,
    base_url: Url,
    limiter: DefaultDirectRateLimiter,
}

impl TvMazeApi {
    /// Create a client for `base_url`, allowing `requests_per_window` upstream
    /// calls per ten seconds.
    pub fn new(base_url: &str, requests_per_window: u32) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).context("Invalid TVMaze base URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("TVMaze base URL cannot be a base: {base_url}");
        }

        let burst = NonZeroU32::new(requests_per_window.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(RATE_WINDOW / burst.get())
            .context("Upstream rate limit period must be non-zero")?
            .allow_burst(burst);

        let http = reqwest::Client::builder()
            .user_agent(concat!("showsearch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            limiter: RateLimiter::direct(quota),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/search/shows?q=<query>`, the query percent-encoded as-is.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search/shows?q={}",
            self.base_url.as_str().trim_end_matches('/'),
            urlencoding::encode(query)
        )
    }

    /// Fetch the raw search response body without interpreting it.
    pub async fn search_shows_raw(&self, query: &str) -> Result<String, TvMazeError> {
        let url = self.search_url(query);

        self.limiter.until_ready().await;
        let timer = SlowCall::start("upstream show search", SLOW_UPSTREAM);
        trace!(url = %url, "requesting upstream search");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), query, "upstream search rejected");
            return Err(TvMazeError::from_status(status));
        }

        let body = response.text().await?;
        let elapsed = timer.finish();
        debug!(
            query,
            bytes = body.len(),
            duration = fmt_duration(elapsed),
            "upstream search completed"
        );
        Ok(body)
    }
}
