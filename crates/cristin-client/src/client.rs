//! HTTP client for the Cristin REST API.
//!
//! Wraps `reqwest` with Cristin-specific URL construction, status handling
//! and typed decode failures. Each call is a single fail-fast request with
//! no retries; the caller decides what a failure means for the request as a
//! whole.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;
use crate::validate::{Language, QueryParams};

pub const DEFAULT_BASE_URL: &str = "https://api.cristin.no/v2/";

/// Header Cristin uses to report the total number of matches for a query.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

const USER_AGENT: &str = "cristin-proxy/0.1 (project-search)";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw result of a list query: the body text plus the upstream-reported
/// total match count, when the header was present and numeric.
#[derive(Debug, Clone)]
pub struct QueryResults {
    pub body: String,
    pub total_count: Option<u64>,
}

/// Capability seam towards the upstream Cristin API.
///
/// The production implementation is [`CristinApiClient`]; handler tests
/// substitute a stub with canned bodies or forced failures.
#[async_trait]
pub trait CristinApi: Send + Sync {
    /// Build the list-query URL. Pure and deterministic, with a fixed
    /// parameter order: `lang`, `page`, `per_page`, `title`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Url`] if the URL cannot be constructed.
    fn query_projects_url(&self, params: &QueryParams) -> Result<Url, UpstreamError>;

    /// Build the detail URL for one project: `{base}/projects/{id}?lang={l}`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Url`] if the URL cannot be constructed.
    fn get_project_url(&self, id: u64, language: Language) -> Result<Url, UpstreamError>;

    /// Fetch the list endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Http`] on network failure and
    /// [`UpstreamError::Status`] on any non-2xx response.
    async fn fetch_query_results(&self, url: &Url) -> Result<QueryResults, UpstreamError>;

    /// Fetch the detail endpoint.
    ///
    /// # Errors
    ///
    /// Upstream 404 maps to [`UpstreamError::NotFound`], which callers treat
    /// as a valid outcome distinct from failure; any other non-2xx response
    /// is [`UpstreamError::Status`], network failure [`UpstreamError::Http`].
    async fn fetch_project(&self, url: &Url) -> Result<String, UpstreamError>;
}

/// Client for the Cristin REST API.
///
/// Use [`CristinApiClient::new`] for production or
/// [`CristinApiClient::with_base_url`] to point at a mock server in tests.
pub struct CristinApiClient {
    client: Client,
    base_url: Url,
}

impl CristinApiClient {
    /// Creates a client pointed at the production Cristin API.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, UpstreamError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`UpstreamError::Url`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        // Normalise: exactly one trailing slash so Url::join appends to the
        // base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| UpstreamError::Url(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    fn join(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url
            .join(path)
            .map_err(|e| UpstreamError::Url(format!("cannot join '{path}': {e}")))
    }
}

#[async_trait]
impl CristinApi for CristinApiClient {
    fn query_projects_url(&self, params: &QueryParams) -> Result<Url, UpstreamError> {
        let mut url = self.join("projects/")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("lang", params.language.code());
            pairs.append_pair("page", &params.page.to_string());
            pairs.append_pair("per_page", &params.results_per_page.to_string());
            pairs.append_pair("title", &params.title);
        }
        Ok(url)
    }

    fn get_project_url(&self, id: u64, language: Language) -> Result<Url, UpstreamError> {
        let mut url = self.join(&format!("projects/{id}"))?;
        url.query_pairs_mut().append_pair("lang", language.code());
        Ok(url)
    }

    async fn fetch_query_results(&self, url: &Url) -> Result<QueryResults, UpstreamError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        let total_count = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let body = response.text().await?;
        Ok(QueryResults { body, total_count })
    }

    async fn fetch_project(&self, url: &Url) -> Result<String, UpstreamError> {
        let response = self.client.get(url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(UpstreamError::NotFound),
            status if !status.is_success() => Err(UpstreamError::Status(status.as_u16())),
            _ => Ok(response.text().await?),
        }
    }
}

/// Strictly decode a JSON body into `T`.
///
/// # Errors
///
/// Returns [`UpstreamError::Decode`] tagged with `context` on malformed
/// JSON or missing required fields.
pub fn from_json<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|e| UpstreamError::Decode {
        context: context.to_owned(),
        source: e,
    })
}
