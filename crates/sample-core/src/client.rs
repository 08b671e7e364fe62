//! HTTP transport used by the resource managers.
//!
//! Managers only see the [`Transport`] trait: a method, a path relative to the
//! service root (optionally carrying a query string) and an optional JSON body
//! in, the parsed JSON body out. [`HttpClient`] implements it on top of
//! `reqwest`, attaching the token and API version headers to every request.
//! No retries are performed at this layer.

use crate::auth::{NoAuth, TokenProvider, AUTH_TOKEN_HEADER};
use crate::config::{SampleClientConfig, DEFAULT_TIMEOUT_SECS};
use crate::error::{map_status_to_error, Error, Result};
use crate::version::{select_version, ApiVersion, VersionSelectState, API_VERSION_HEADER};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = concat!("sample-core/", env!("CARGO_PKG_VERSION"));

/// Connect timeout applied regardless of the request timeout.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request primitive the resource managers are written against.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and return the decoded JSON body.
    ///
    /// `path` is relative to the service root and may include a query string.
    /// Returns `Ok(None)` when the response has no body.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-success statuses and
    /// bodies that are not valid JSON.
    async fn json_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>>;
}

/// Builder for [`HttpClient`].
#[derive(Clone)]
pub struct HttpClientBuilder {
    endpoint: String,
    timeout: Duration,
    user_agent: String,
    api_version: Option<String>,
    token_provider: Arc<dyn TokenProvider>,
}

impl fmt::Debug for HttpClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl HttpClientBuilder {
    /// Create a builder for the specified endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            api_version: None,
            token_provider: Arc::new(NoAuth),
        }
    }

    /// Create a builder pre-populated from a validated configuration.
    #[must_use]
    pub fn from_config(config: &SampleClientConfig) -> Self {
        let mut builder = Self::new(config.endpoint.clone()).with_timeout(config.timeout());
        if let Some(token) = &config.token {
            builder = builder.with_token_provider(crate::auth::StaticToken::from(token.clone()));
        }
        if let Some(version) = &config.api_version {
            builder = builder.with_api_version(version.clone());
        }
        builder
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Request a specific API version instead of the default.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the token provider consulted before every request.
    #[must_use]
    pub fn with_token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token_provider = Arc::new(provider);
        self
    }

    /// Set an already shared token provider.
    #[must_use]
    pub fn with_shared_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = provider;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or API version is invalid, or the
    /// underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpClient> {
        let base_url = Url::parse(&self.endpoint).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid endpoint `{}`: {err}", self.endpoint))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(format!(
                "Endpoint `{}` cannot be used as a base URL",
                self.endpoint
            )));
        }

        let (api_version, select_state) = select_version(self.api_version.as_deref())?;

        let http = ClientBuilder::new()
            .user_agent(self.user_agent)
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        info!(
            endpoint = %base_url,
            api_version = %api_version,
            select_state = %select_state,
            "Sample HTTP client ready"
        );

        Ok(HttpClient {
            http,
            base_url,
            api_version,
            select_state,
            token_provider: self.token_provider,
        })
    }
}

/// `reqwest`-backed [`Transport`].
#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_url: Url,
    api_version: ApiVersion,
    select_state: VersionSelectState,
    token_provider: Arc<dyn TokenProvider>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("select_state", &self.select_state)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Construct a client for an endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid base URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        HttpClientBuilder::new(endpoint).build()
    }

    /// Start a builder for an endpoint.
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> HttpClientBuilder {
        HttpClientBuilder::new(endpoint)
    }

    /// Return the endpoint URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The API version sent with every request.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Whether the API version was the default or chosen by the caller.
    #[must_use]
    pub const fn select_state(&self) -> VersionSelectState {
        self.select_state
    }

    /// Resolve a manager path against the endpoint.
    ///
    /// The endpoint's own path is kept as a prefix so services mounted below
    /// the host root work. Paths that already carry that prefix (for example
    /// `next` links returned by the service) are not prefixed twice.
    fn build_url(&self, path: &str) -> Result<Url> {
        let prefix = self.base_url.path().trim_end_matches('/');
        let relative = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let full_path = if prefix.is_empty()
            || relative == prefix
            || relative.starts_with(&format!("{prefix}/"))
            || relative.starts_with(&format!("{prefix}?"))
        {
            relative
        } else {
            format!("{prefix}{relative}")
        };

        self.base_url
            .join(&full_path)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn json_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>> {
        let url = self.build_url(path)?;
        debug!(%method, %url, has_body = body.is_some(), "Sending Sample request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Accept", "application/json")
            .header(API_VERSION_HEADER, self.api_version.to_string());

        if let Some(token) = self.token_provider.token()? {
            request = request.header(AUTH_TOKEN_HEADER, token.expose_secret());
        }

        if let Some(payload) = &body {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(%method, %status, "Sample request failed");
            return Err(map_status_to_error(status, &text));
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text).map(Some).map_err(|err| {
            Error::ParseError(format!("Failed to parse response for `{path}`: {err}"))
        })
    }
}
