//! Error types for the Watson service clients.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Unified error type covering configuration, argument validation, transport,
/// decoding, and HTTP status failures.
///
/// Status-derived variants carry the message extracted from the service's
/// error body (the `error`, `error_message`, or `message` field) so callers
/// can log it without re-reading the response.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or invalid configuration (credentials, endpoint, options).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A call argument failed local validation; no request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading a local file (image, glossary) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be sent or the response could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded into the expected model.
    #[error("Parse error: {0}")]
    Parse(String),

    /// HTTP 400.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// HTTP 403 or 406.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// HTTP 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 409.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// HTTP 413.
    #[error("Request too large: {0}")]
    RequestTooLarge(String),

    /// HTTP 415.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// HTTP 429, or an Alchemy daily transaction limit.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// HTTP 500.
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    /// HTTP 503.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Any other non-success HTTP status.
    #[error("Service error {status}: {message}")]
    Status { status: u16, message: String },

    /// The call exceeded its configured timeout.
    #[error("Timeout")]
    Timeout,

    /// The client's circuit breaker is open.
    #[error("Unavailable")]
    Unavailable,
}

impl ServiceError {
    /// Returns `true` for transient errors that may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_)
                | Self::InternalServerError(_)
                | Self::ServiceUnavailable(_)
                | Self::Transport(_)
                | Self::Timeout
                | Self::Unavailable
        )
    }

    /// The HTTP status behind this error, when it came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::RequestTooLarge(_) => Some(413),
            Self::UnsupportedMediaType(_) => Some(415),
            Self::RateLimited(_) => Some(429),
            Self::InternalServerError(_) => Some(500),
            Self::ServiceUnavailable(_) => Some(503),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map a non-success HTTP status and its extracted message to an error.
    ///
    /// `message` is `None` when the body was empty; a per-status default is
    /// used in that case.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let or = |default: &str| message.clone().unwrap_or_else(|| default.to_string());
        match status {
            400 => Self::BadRequest(or("Bad Request")),
            401 => Self::Unauthorized(
                "Unauthorized: Access is denied due to invalid credentials".to_string(),
            ),
            403 | 406 => Self::Forbidden(or("Forbidden: Service refuse the request")),
            404 => Self::NotFound(or("Not found")),
            409 => Self::Conflict(or("")),
            413 => Self::RequestTooLarge(or(
                "Request too large: The request entity is larger than the server is able to process",
            )),
            415 => Self::UnsupportedMediaType(or("Unsupported Media Type")),
            429 => Self::RateLimited(or("Too many requests")),
            500 => Self::InternalServerError(or("Internal Server Error")),
            503 => Self::ServiceUnavailable(or("Service Unavailable")),
            _ => Self::Status {
                status,
                message: message.clone().unwrap_or_default(),
            },
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
