//! Error types for Sample service operations.
//!
//! This module provides the error type shared by the transport, the resource
//! managers and the CLI, including HTTP status code mapping and extraction of
//! OpenStack-style fault strings from error bodies.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for Sample service operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A creation attribute outside the allow-list was supplied
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Sample service is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication or authorization failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The server refused the requested API version
    #[error("Not acceptable: {0}")]
    NotAcceptable(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for Sample service operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAttribute(_) => "INVALID_ATTRIBUTE",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotAcceptable(_) => "NOT_ACCEPTABLE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true if this error is a backend "not found" response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Map a non-success HTTP status and its body to an [`Error`].
///
/// The body is unwrapped with [`extract_fault`] first so the message carries
/// the server's fault string rather than the raw JSON envelope.
#[must_use]
pub fn map_status_to_error(status: StatusCode, body: &str) -> Error {
    let text = extract_fault(body);
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(text),
        StatusCode::NOT_ACCEPTABLE => Error::NotAcceptable(text),
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Sample service temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("Sample service error {status}: {text}"))
        }
        _ => Error::HttpError(format!("Sample service error {status}: {text}")),
    }
}

/// Pull the human readable fault out of an OpenStack error body.
///
/// The API wraps failures as `{"error_message": "<json>"}` where the inner
/// document carries `faultstring`. Anything that does not match that shape is
/// returned trimmed and unchanged.
#[must_use]
pub fn extract_fault(body: &str) -> String {
    let Ok(outer) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let Some(message) = outer.get("error_message") else {
        return body.trim().to_string();
    };

    let inner = match message {
        serde_json::Value::String(raw) => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(parsed) => parsed,
            Err(_) => return raw.clone(),
        },
        other => other.clone(),
    };

    inner
        .get("faultstring")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| inner.to_string(), ToString::to_string)
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::InvalidAttribute("name".to_string()).error_code(),
            "INVALID_ATTRIBUTE"
        );
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            Error::NotAcceptable("test".to_string()).error_code(),
            "NOT_ACCEPTABLE"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(Error::Conflict("test".to_string()).error_code(), "CONFLICT");
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidAttribute("name".to_string());
        assert_eq!(err.to_string(), "Invalid attribute: name");

        let err = Error::ServiceUnavailable("sample".to_string());
        assert_eq!(err.to_string(), "Service unavailable: sample");
    }

    #[test]
    fn test_map_status_to_error() {
        assert!(matches!(
            map_status_to_error(StatusCode::NOT_FOUND, "gone"),
            Error::NotFound(msg) if msg == "gone"
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::FORBIDDEN, "nope"),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::NOT_ACCEPTABLE, "version"),
            Error::NotAcceptable(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            Error::ServiceUnavailable(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::IM_A_TEAPOT, "tea"),
            Error::HttpError(_)
        ));
    }

    #[test]
    fn test_extract_fault_nested_string() {
        let body = r#"{"error_message": "{\"faultstring\": \"Sample abc could not be found.\", \"debuginfo\": null}"}"#;
        assert_eq!(extract_fault(body), "Sample abc could not be found.");
    }

    #[test]
    fn test_extract_fault_nested_object() {
        let body = r#"{"error_message": {"faultstring": "Invalid sort_dir"}}"#;
        assert_eq!(extract_fault(body), "Invalid sort_dir");
    }

    #[test]
    fn test_extract_fault_passthrough() {
        assert_eq!(extract_fault("  plain text\n"), "plain text");
        assert_eq!(extract_fault(r#"{"other": 1}"#), r#"{"other": 1}"#);
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let sample_err: Error = err.into();
        assert!(matches!(sample_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let sample_err: Error = err.into();
        assert!(matches!(sample_err, Error::ParseError(_)));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::NotFound("x".to_string()).is_not_found());
        assert!(!Error::Conflict("x".to_string()).is_not_found());
    }
}
