//! Error types for matcha-scout

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the expected shape
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A matcha pattern or URL exclude pattern failed to compile
    #[error("Invalid regex pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised by a single page fetch.
///
/// These never leave the crawler: a failed fetch is reported and skipped.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed or has no host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection, TLS or protocol failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Errors from the places-search API
#[derive(Error, Debug)]
pub enum PlacesError {
    /// Key missing, invalid, or the API is not enabled for the project
    #[error("Authorization denied by places API: {0}")]
    AuthorizationDenied(String),

    /// Query quota exhausted
    #[error("Rate limited by places API: {0}")]
    RateLimited(String),

    /// Malformed request, including an expired page token
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No result for the query or place id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-OK API status
    #[error("Unexpected API status {status}: {message}")]
    UnexpectedStatus { status: String, message: String },

    /// HTTP-level failure talking to the API
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not decode
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl PlacesError {
    /// Map a places API `status` field (plus optional `error_message`) to an error.
    ///
    /// Returns `None` for `OK`.
    pub fn from_status(status: &str, message: Option<&str>) -> Option<Self> {
        let message = message.unwrap_or(status).to_string();
        match status {
            "OK" => None,
            "REQUEST_DENIED" => Some(PlacesError::AuthorizationDenied(message)),
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Some(PlacesError::RateLimited(message)),
            "INVALID_REQUEST" => Some(PlacesError::InvalidRequest(message)),
            "NOT_FOUND" | "ZERO_RESULTS" => Some(PlacesError::NotFound(message)),
            other => Some(PlacesError::UnexpectedStatus {
                status: other.to_string(),
                message,
            }),
        }
    }

    /// Errors that invalidate the whole run rather than a single place
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PlacesError::AuthorizationDenied(_) | PlacesError::RateLimited(_)
        )
    }
}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PlacesError::Decode(err.to_string())
        } else {
            PlacesError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PlacesError {
    fn from(err: serde_json::Error) -> Self {
        PlacesError::Decode(err.to_string())
    }
}

/// Top-level errors returned by [`crate::Scout`]
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Places(#[from] PlacesError),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(PlacesError::from_status("OK", None).is_none());

        let denied = PlacesError::from_status("REQUEST_DENIED", Some("API not enabled")).unwrap();
        assert!(matches!(denied, PlacesError::AuthorizationDenied(ref m) if m == "API not enabled"));
        assert!(denied.is_fatal());

        let limited = PlacesError::from_status("OVER_QUERY_LIMIT", None).unwrap();
        assert!(matches!(limited, PlacesError::RateLimited(_)));
        assert!(limited.is_fatal());

        let invalid = PlacesError::from_status("INVALID_REQUEST", None).unwrap();
        assert!(!invalid.is_fatal());

        let other = PlacesError::from_status("UNKNOWN_ERROR", None).unwrap();
        assert!(matches!(other, PlacesError::UnexpectedStatus { ref status, .. } if status == "UNKNOWN_ERROR"));
    }

    #[test]
    fn test_authorization_and_rate_limit_are_distinguishable() {
        let denied = PlacesError::from_status("REQUEST_DENIED", None).unwrap();
        let limited = PlacesError::from_status("OVER_DAILY_LIMIT", None).unwrap();
        assert_ne!(denied.to_string(), limited.to_string());
    }
}
