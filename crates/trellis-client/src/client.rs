//! Main client implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Instrument, Span};
use url::Url;

use trellis_config::{Scope, TrellisConfig};

use crate::api::{EntitiesApi, TransformsApi, WorkflowsApi};
use crate::error::{Error, Result};

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://enterprise.training.api.runtrellis.com/v1";

/// Value of the `API-Version` header sent with every request.
pub const API_VERSION: &str = "2025-03";

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of body characters copied into log lines.
const LOG_BODY_LIMIT: usize = 200;

/// Header carrying [`API_VERSION`].
const API_VERSION_HEADER: &str = "api-version";

/// Trellis API client.
///
/// Cheap to clone; all clones share one connection pool and one scope.
///
/// # Example
///
/// ```no_run
/// use trellis_client::TrellisClient;
/// use trellis_config::Scope;
///
/// # async fn example() -> trellis_client::Result<()> {
/// let client = TrellisClient::builder()
///     .api_key("key_123")
///     .scope(Scope::new("proj_1", "wflow_A"))
///     .build()?;
///
/// let entities = client.entities().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TrellisClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    scope: Scope,
    timeout: Duration,
    /// Span every outbound call is logged in.
    span: Span,
}

impl TrellisClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from startup configuration.
    pub fn from_config(config: &TrellisConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// The project/workflow scope this client is pinned to.
    pub fn scope(&self) -> &Scope {
        &self.inner.scope
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the transformations API.
    pub fn transforms(&self) -> TransformsApi {
        TransformsApi::new(self.clone())
    }

    /// Access the entities API.
    pub fn entities(&self) -> EntitiesApi {
        EntitiesApi::new(self.clone())
    }

    /// Access the workflows API, bound to the configured workflow.
    pub fn workflows(&self) -> WorkflowsApi {
        WorkflowsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL by appending percent-encoded path segments to the base URL.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments)?;
        let request = self.inner.http.get(url.clone());
        self.execute(Method::GET, &url, request).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, segments: &[&str], query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        let request = self.inner.http.get(url.clone()).query(query);
        self.execute(Method::GET, &url, request).await
    }

    /// Make a PATCH request with a JSON body.
    pub(crate) async fn patch<T, B>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        let request = self.inner.http.patch(url.clone()).json(body);
        self.execute(Method::PATCH, &url, request).await
    }

    /// Send a request once and decode the response.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T> {
        let path = url.path().to_string();
        let timeout = self.inner.timeout;

        async move {
            let started = Instant::now();
            tracing::debug!(%method, %path, "sending request");

            let response = match request.timeout(timeout).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(
                        %method,
                        %path,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        timeout = e.is_timeout(),
                        error = %e,
                        "request failed"
                    );
                    return Err(Error::Transport(e));
                }
            };

            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!(%method, %path, status = status.as_u16(), error = %e, "failed to read response body");
                    return Err(Error::Transport(e));
                }
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;

            if !status.is_success() {
                tracing::warn!(
                    %method,
                    %path,
                    status = status.as_u16(),
                    elapsed_ms,
                    body = %truncate(&body, LOG_BODY_LIMIT),
                    "remote API returned an error"
                );
                return Err(Error::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            tracing::info!(%method, %path, status = status.as_u16(), elapsed_ms, "request completed");
            decode(status.as_u16(), &body)
        }
        .instrument(self.inner.span.clone())
        .await
    }
}

impl std::fmt::Debug for TrellisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrellisClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("scope", &self.inner.scope)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

/// Decode a success body; an empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|source| Error::Decode { status, source })
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Builder for creating a [`TrellisClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    api_key: Option<String>,
    api_version: String,
    scope: Option<Scope>,
    timeout: Duration,
    user_agent: Option<String>,
    span: Option<Span>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_version: API_VERSION.to_string(),
            scope: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            span: None,
        }
    }

    /// Override the base URL (defaults to [`DEFAULT_BASE_URL`]).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key sent in the `Authorization` header.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the `API-Version` header value.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the project/workflow scope.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Start from startup configuration: key, scope, and any base URL or
    /// timeout override.
    pub fn from_config(config: &TrellisConfig) -> Self {
        let mut builder = Self::new()
            .api_key(config.api_key())
            .scope(config.scope.clone());
        if let Some(url) = &config.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the span outbound calls are recorded in.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TrellisClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("api key is required".to_string()))?;
        let scope = self
            .scope
            .ok_or_else(|| Error::Config("scope is required".to_string()))?;

        let base_url = Url::parse(&self.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base URL '{}' cannot hold a path",
                self.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&api_key)
            .map_err(|_| Error::Config("invalid api key".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let version = HeaderValue::from_str(&self.api_version)
            .map_err(|_| Error::Config("invalid API version".to_string()))?;
        headers.insert(HeaderName::from_static(API_VERSION_HEADER), version);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("trellis-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        let span = self
            .span
            .unwrap_or_else(|| tracing::info_span!("trellis_client"));

        Ok(TrellisClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                scope,
                timeout: self.timeout,
                span,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
