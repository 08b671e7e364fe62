//! Configuration structures for Sample clients.
//!
//! This module provides the validated configuration a client is built from:
//! the service endpoint, an optional pre-issued token, the request timeout
//! and the requested API version.

use crate::version::{select_version, ApiVersion, VersionSelectState};
use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Configuration for a Sample client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SampleClientConfig {
    /// Sample service endpoint (e.g. `http://sample.example.com:6385`)
    #[validate(url)]
    pub endpoint: String,

    /// Optional pre-issued authentication token, never read from or written to files
    #[serde(skip)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Requested API version (`major.minor` or `latest`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SampleClientConfig {
    /// Create a new client configuration for an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            endpoint: endpoint.into(),
            token: None,
            timeout_secs: default_timeout_secs(),
            api_version: None,
        };

        config.check()?;
        Ok(config)
    }

    /// Set the authentication token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Pin the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Validate every field, mapping failures to [`Error::ConfigError`].
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the API version cannot be parsed.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        self.version()?;
        Ok(())
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_endpoint(&self) -> Result<Url, Error> {
        Url::parse(&self.endpoint)
            .map_err(|e| Error::ConfigError(format!("Invalid endpoint URL: {e}")))
    }

    /// Resolve the API version to send and how it was selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured version cannot be parsed.
    pub fn version(&self) -> Result<(ApiVersion, VersionSelectState), Error> {
        select_version(self.api_version.as_deref())
    }
}
