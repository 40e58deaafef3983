//! Error types for VPSie operations.
//!
//! One error enum is shared by every resource crate. HTTP statuses are folded
//! into it by [`Error::from_status`], and in-band API failures surface as
//! [`Error::ApiError`].

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Main error type for VPSie operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// VPSie API is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
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

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or rejected access token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The API answered successfully but flagged the envelope as an error
    #[error("API error: {0}")]
    ApiError(String),

    /// Invariant broken inside the client
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for VPSie operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable machine-readable name of the variant.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::ApiError(_) => "API_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// The detail text carried by the variant, without the display prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::ServiceUnavailable(m)
            | Self::ParseError(m)
            | Self::ConfigError(m)
            | Self::HttpError(m)
            | Self::Timeout(m)
            | Self::NotFound(m)
            | Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::ValidationError(m)
            | Self::Conflict(m)
            | Self::ApiError(m)
            | Self::InternalError(m)
            | Self::InvalidEndpoint(m) => m,
        }
    }

    /// Returns true if the same request may succeed when sent again later.
    ///
    /// Requests are never re-sent by this crate; callers decide.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_) | Self::Timeout(_))
    }

    /// Returns true if the request never left the process.
    #[must_use]
    pub const fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::ConfigError(_) | Self::InvalidEndpoint(_)
        )
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::InternalError(_) | Self::ConfigError(_) | Self::ParseError(_)
        )
    }

    /// Map a non-success HTTP status and its body to an error.
    ///
    /// The server's `message` field is used when the body is a JSON object
    /// carrying one; otherwise the raw body text is kept.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let text = api_message(body).unwrap_or_else(|| body.to_string());

        match status {
            StatusCode::NOT_FOUND => Self::NotFound(text),
            StatusCode::BAD_REQUEST => Self::BadRequest(text),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::Unauthorized(format!("VPSie authentication failed: {text}"))
            }
            StatusCode::CONFLICT => Self::Conflict(text),
            StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                Self::ServiceUnavailable(format!("VPSie temporarily unavailable: {text}"))
            }
            status if status.is_server_error() => {
                Self::ServiceUnavailable(format!("VPSie server error {status}: {text}"))
            }
            _ => Self::HttpError(format!("VPSie error {status}: {text}")),
        }
    }
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

fn api_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiMessage>(body)
        .ok()
        .map(|parsed| parsed.message)
        .filter(|message| !message.is_empty())
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
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
