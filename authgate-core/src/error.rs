//! Error types for authgate.
//!
//! This module provides a unified error type for all authgate operations.
//! Configuration variants are only produced at startup and are fatal by the
//! time the binary sees them; upstream variants are per-request and map to
//! gateway-level HTTP responses.

use thiserror::Error;

/// Result type alias for authgate operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Unified error type for authgate operations.
///
/// # Example
///
/// ```
/// use authgate_core::error::{GateError, Result};
///
/// fn parse_origin(raw: &str) -> Result<()> {
///     if raw.is_empty() {
///         return Err(GateError::InvalidOrigin("origin URL is empty".into()));
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Error)]
pub enum GateError {
    /// Prefix rule string does not have exactly three `:`-delimited fields.
    #[error("malformed prefix rule (expected '<prefix>:<username>:<password>'): {0:?}")]
    MalformedRule(String),

    /// Prefix rule with an empty prefix field.
    #[error("prefix rule has an empty prefix: {0:?}")]
    EmptyPrefix(String),

    /// The same prefix appears more than once in the rule configuration.
    #[error("duplicate prefix in rule configuration: {0:?}")]
    DuplicatePrefix(String),

    /// Origin URL could not be parsed or has no host.
    #[error("invalid origin URL: {0}")]
    InvalidOrigin(String),

    /// Origin URL scheme is neither http nor https.
    #[error("unsupported origin scheme (expected http or https): {0}")]
    UnsupportedScheme(String),

    /// Upstream connection failed.
    #[error("upstream connection failed: {0}")]
    UpstreamConnectionFailed(String),

    /// Upstream request timed out.
    #[error("upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// Failed to read the request or response body.
    #[error("body read error: {0}")]
    BodyReadError(String),

    /// HTTP client error (from reqwest).
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl GateError {
    /// Returns the appropriate HTTP status code for this error.
    ///
    /// Configuration errors never reach request-serving state; if one does
    /// surface through this mapping, it is an internal error.
    pub fn status_code(&self) -> hyper::StatusCode {
        use hyper::StatusCode;

        match self {
            Self::MalformedRule(_)
            | Self::EmptyPrefix(_)
            | Self::DuplicatePrefix(_)
            | Self::InvalidOrigin(_)
            | Self::UnsupportedScheme(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamConnectionFailed(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::BodyReadError(_) => StatusCode::BAD_REQUEST,
            Self::HttpClientError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Returns a user-facing message suitable for HTTP response bodies.
    ///
    /// Sanitized: never exposes rule contents or upstream addresses.
    pub fn user_message(&self) -> &str {
        match self {
            Self::MalformedRule(_)
            | Self::EmptyPrefix(_)
            | Self::DuplicatePrefix(_)
            | Self::InvalidOrigin(_)
            | Self::UnsupportedScheme(_) => "internal server error",
            Self::UpstreamConnectionFailed(_) => "could not connect to upstream",
            Self::UpstreamTimeout(_) => "upstream timeout",
            Self::BodyReadError(_) => "bad request",
            Self::HttpClientError(_) => "bad gateway",
        }
    }

    /// Returns true for startup-time configuration errors.
    ///
    /// These are fatal: the process must never enter request-serving state
    /// with one of these pending.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRule(_)
                | Self::EmptyPrefix(_)
                | Self::DuplicatePrefix(_)
                | Self::InvalidOrigin(_)
                | Self::UnsupportedScheme(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_error_display() {
        let err = GateError::MalformedRule("/foo:bar".into());
        assert_eq!(
            err.to_string(),
            "malformed prefix rule (expected '<prefix>:<username>:<password>'): \"/foo:bar\""
        );

        let err = GateError::DuplicatePrefix("/admin/".into());
        assert_eq!(
            err.to_string(),
            "duplicate prefix in rule configuration: \"/admin/\""
        );

        let err = GateError::UpstreamTimeout("deadline exceeded".into());
        assert_eq!(err.to_string(), "upstream timeout: deadline exceeded");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GateError::MalformedRule("".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GateError::UpstreamConnectionFailed("".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GateError::UpstreamTimeout("".into()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            GateError::BodyReadError("".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_user_messages_are_sanitized() {
        let err = GateError::UpstreamConnectionFailed("10.0.0.7:9000 refused".into());
        assert!(!err.user_message().contains("10.0.0.7"));

        let err = GateError::MalformedRule("/secret:admin:hunter2".into());
        assert!(!err.user_message().contains("hunter2"));
    }

    #[test]
    fn test_is_config_error() {
        assert!(GateError::MalformedRule("".into()).is_config_error());
        assert!(GateError::EmptyPrefix("".into()).is_config_error());
        assert!(GateError::DuplicatePrefix("".into()).is_config_error());
        assert!(GateError::InvalidOrigin("".into()).is_config_error());
        assert!(GateError::UnsupportedScheme("".into()).is_config_error());

        assert!(!GateError::UpstreamConnectionFailed("".into()).is_config_error());
        assert!(!GateError::UpstreamTimeout("".into()).is_config_error());
        assert!(!GateError::BodyReadError("".into()).is_config_error());
    }
}
