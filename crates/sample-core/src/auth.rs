//! Token providers.
//!
//! Obtaining and refreshing tokens is left to the caller; the transport only
//! asks a [`TokenProvider`] for the current token before each request and
//! sends it as `X-Auth-Token`.

use secrecy::SecretString;

use crate::error::Result;

/// Header carrying the authentication token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Supplies the token sent with each request.
pub trait TokenProvider: Send + Sync {
    /// Returns the token to send, or `None` to send the request unauthenticated.
    ///
    /// # Errors
    ///
    /// Implementations may fail if the token cannot be obtained.
    fn token(&self) -> Result<Option<SecretString>>;
}

/// Sends requests without a token (standalone deployments).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl TokenProvider for NoAuth {
    fn token(&self) -> Result<Option<SecretString>> {
        Ok(None)
    }
}

/// A fixed, pre-issued token.
#[derive(Debug, Clone)]
pub struct StaticToken(SecretString);

impl StaticToken {
    /// Wrap a pre-issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl From<SecretString> for StaticToken {
    fn from(token: SecretString) -> Self {
        Self(token)
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<Option<SecretString>> {
        Ok(Some(self.0.clone()))
    }
}

impl<F> TokenProvider for F
where
    F: Fn() -> Result<Option<SecretString>> + Send + Sync,
{
    fn token(&self) -> Result<Option<SecretString>> {
        self()
    }
}
