//! Error Types
//!
//! Error hierarchy for the iiko server client, with a single classification
//! point for authorization failures.

use std::time::Duration;
use thiserror::Error;

/// Root error type for the iiko server client.
#[derive(Error, Debug)]
pub enum IikoServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl IikoServerError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "IIKO_CONFIG",
            Self::Auth(_) => "IIKO_AUTH",
            Self::Api(_) => "IIKO_API",
            Self::Network(_) => "IIKO_NETWORK",
            Self::Protocol(_) => "IIKO_PROTOCOL",
        }
    }

    /// Classify an error as an authorization failure (expired or invalid
    /// session on a business call).
    ///
    /// This is the only classification point consulted by the retry wrapper
    /// and the token authority. A 401 produced by the auth endpoint itself is
    /// surfaced as [`AuthError::InvalidCredentials`] and is deliberately NOT
    /// classified as unauthorized here, so it is never retried.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError::Unauthorized { .. })
                | Self::Api(ApiError::Status { status: 401, .. })
        )
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {name} is not set")]
    MissingEnvVar { name: String },

    #[error("Failed to read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error("Key '{key}' not found in config file")]
    MissingKey { key: String },

    #[error("Invalid server host: {host}")]
    InvalidHost { host: String },
}

/// Authentication / token lifecycle error.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The auth endpoint rejected the credentials (401 on the auth request).
    /// Terminal: retrying with the same credentials cannot succeed.
    #[error("Invalid credentials: auth endpoint returned 401")]
    InvalidCredentials,

    /// Token fetch or refresh failed for a non-credential reason.
    /// The stored token is cleared so a later call starts from scratch.
    #[error("Token fetch failed: {message}")]
    TokenFetch { message: String },
}

/// Error reported by a business API call.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized (session expired or invalid)")]
    Unauthorized { body: String },

    #[error("Server returned HTTP {status}")]
    Status { status: u16, body: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// Result type for iiko server operations.
pub type IikoServerResult<T> = Result<T, IikoServerError>;

/// Map a non-2xx HTTP response from a business endpoint to an error.
pub fn classify_status(status: u16, body: &str) -> IikoServerError {
    match status {
        401 => IikoServerError::Api(ApiError::Unauthorized {
            body: body.to_string(),
        }),
        _ => IikoServerError::Api(ApiError::Status {
            status,
            body: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        assert!(classify_status(401, "").is_unauthorized());
        assert!(!classify_status(500, "boom").is_unauthorized());
        assert!(!classify_status(404, "").is_unauthorized());
    }

    #[test]
    fn test_invalid_credentials_not_retryable() {
        // 401 from the auth endpoint is terminal, not a refresh trigger.
        let err = IikoServerError::Auth(AuthError::InvalidCredentials);
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            IikoServerError::Auth(AuthError::InvalidCredentials).error_code(),
            "IIKO_AUTH"
        );
        assert_eq!(classify_status(500, "").error_code(), "IIKO_API");
    }
}
