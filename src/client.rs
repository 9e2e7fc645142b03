//! HTTP client for the status server's read-only API.

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::data::{EndpointStatus, ServerConfig};
use crate::settings::StoredAuth;

/// Number of results requested per status page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Duration token accepted by the badge and chart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeDuration {
    OneHour,
    TwentyFourHours,
    SevenDays,
    ThirtyDays,
}

impl BadgeDuration {
    /// The token as it appears in the URL path.
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeDuration::OneHour => "1h",
            BadgeDuration::TwentyFourHours => "24h",
            BadgeDuration::SevenDays => "7d",
            BadgeDuration::ThirtyDays => "30d",
        }
    }

    /// All supported tokens, in ascending window order.
    pub fn all() -> &'static [BadgeDuration] {
        &[
            BadgeDuration::OneHour,
            BadgeDuration::TwentyFourHours,
            BadgeDuration::SevenDays,
            BadgeDuration::ThirtyDays,
        ]
    }
}

/// Client for the status API.
///
/// Requests always carry the session cookie jar; a Basic Authorization
/// header is added when credentials are stored locally.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given server base URL.
    pub fn new(base_url: &str, auth: Option<&StoredAuth>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(auth) = auth {
            let value = format!("Basic {}", auth.credentials);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&value).context("stored credentials are not a valid header")?,
            );
        }
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the server's client-facing configuration.
    pub async fn fetch_config(&self) -> Result<ServerConfig> {
        let url = format!("{}/api/v1/config", self.base_url);
        self.get_json(&url).await
    }

    /// Fetch one page of endpoint statuses.
    pub async fn fetch_statuses(&self, page: u32) -> Result<Vec<EndpointStatus>> {
        let url = format!(
            "{}/api/v1/endpoints/statuses?page={}&pageSize={}",
            self.base_url, page, DEFAULT_PAGE_SIZE
        );
        self.get_json(&url).await
    }

    /// Fetch a single endpoint's status, including its results for the
    /// given page and its state-transition events.
    pub async fn fetch_status(&self, key: &str, page: u32) -> Result<EndpointStatus> {
        let url = format!(
            "{}/api/v1/endpoints/{}/statuses?page={}&pageSize={}",
            self.base_url, key, page, DEFAULT_PAGE_SIZE
        );
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        if !status.is_success() {
            bail!("{} returned {}", url, status);
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to parse response from {}", url))
    }

    /// URL of the health badge for an endpoint.
    pub fn health_badge_url(&self, key: &str) -> String {
        format!("{}/api/v1/endpoints/{}/health/badge.svg", self.base_url, key)
    }

    /// URL of the uptime badge for an endpoint over a duration window.
    pub fn uptime_badge_url(&self, key: &str, duration: BadgeDuration) -> String {
        format!(
            "{}/api/v1/endpoints/{}/uptimes/{}/badge.svg",
            self.base_url,
            key,
            duration.as_str()
        )
    }

    /// URL of the response-time badge for an endpoint over a duration
    /// window.
    pub fn response_time_badge_url(&self, key: &str, duration: BadgeDuration) -> String {
        format!(
            "{}/api/v1/endpoints/{}/response-times/{}/badge.svg",
            self.base_url,
            key,
            duration.as_str()
        )
    }

    /// URL of the response-time chart for an endpoint over a duration
    /// window.
    pub fn response_time_chart_url(&self, key: &str, duration: BadgeDuration) -> String {
        format!(
            "{}/api/v1/endpoints/{}/response-times/{}/chart.svg",
            self.base_url,
            key,
            duration.as_str()
        )
    }
}
