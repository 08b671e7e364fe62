//! Sample v1 client aggregator.

use crate::v1::sample::SampleManager;
use crate::Result;
use sample_core::config::SampleClientConfig;
use sample_core::{
    ApiVersion, HttpClient, HttpClientBuilder, StaticToken, TokenProvider, Transport,
    VersionSelectState,
};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("sample-client/", env!("CARGO_PKG_VERSION"));

/// Builder for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    inner: HttpClientBuilder,
}

impl ClientBuilder {
    /// Create a builder for the specified endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            inner: HttpClientBuilder::new(endpoint).with_user_agent(USER_AGENT),
        }
    }

    /// Create a builder from a validated configuration.
    #[must_use]
    pub fn from_config(config: &SampleClientConfig) -> Self {
        Self {
            inner: HttpClientBuilder::from_config(config).with_user_agent(USER_AGENT),
        }
    }

    /// Send a fixed `X-Auth-Token` with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token_provider(StaticToken::new(token));
        self
    }

    /// Consult a token provider before every request.
    #[must_use]
    pub fn with_token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.inner = self.inner.with_token_provider(provider);
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    /// Pin an API version (`major.minor` or `latest`).
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.inner = self.inner.with_api_version(version);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or API version is invalid.
    pub fn build(self) -> Result<Client> {
        let http = Arc::new(self.inner.build()?);
        let transport: Arc<dyn Transport> = http.clone();
        Ok(Client {
            sample: SampleManager::new(transport),
            http,
        })
    }
}

/// Entry point to the Sample v1 API.
///
/// Owns the HTTP transport and exposes one manager per resource; every
/// manager shares the same transport.
#[derive(Debug, Clone)]
pub struct Client {
    http: Arc<HttpClient>,
    sample: SampleManager,
}

impl Client {
    /// Start a builder for an endpoint.
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(endpoint)
    }

    /// Construct a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid base URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(endpoint).build()
    }

    /// Sample operations.
    #[must_use]
    pub fn sample(&self) -> &SampleManager {
        &self.sample
    }

    /// The API version sent with every request.
    #[must_use]
    pub fn api_version(&self) -> ApiVersion {
        self.http.api_version()
    }

    /// Whether [`Client::api_version`] is the default or was chosen by the caller.
    #[must_use]
    pub fn select_state(&self) -> VersionSelectState {
        self.http.select_state()
    }

    /// Return the endpoint URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.http.base_url()
    }
}
