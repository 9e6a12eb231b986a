//! Error handling for the marketplace API module

use crate::logging::LogLevel;
use serde::Deserialize;
use thiserror::Error;

/// Failure taxonomy for section fetches, derived from the HTTP status where
/// one is available. Everything else is surfaced as `Unknown` with the raw
/// message attached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The stored credentials were rejected by the backend.
    #[error("session expired or invalid")]
    Unauthorized,

    /// The account is not allowed to access the buddy dashboard.
    #[error("access denied")]
    Forbidden,

    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,

    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// Anything else the backend reported.
    #[error("{0}")]
    Unknown(String),
}

/// Error body shape the backend uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| {
                serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(|parsed| parsed.message)
                    .or_else(|| (!body.is_empty()).then_some(body))
            })
            .unwrap_or_else(|| format!("request failed with status {}", status));

        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            _ => ApiError::Unknown(message),
        }
    }

    /// Classify error and determine appropriate log level
    pub fn log_level(&self) -> LogLevel {
        match self {
            // Authentication errors - critical
            ApiError::Unauthorized | ApiError::Forbidden => LogLevel::Error,

            // Network issues - usually temporary
            ApiError::Network(_) => LogLevel::Warn,

            // Other errors
            ApiError::NotFound | ApiError::Unknown(_) => LogLevel::Warn,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Network("request timed out".to_string())
        } else if error.is_connect() {
            ApiError::Network("connection failed".to_string())
        } else if error.is_decode() {
            ApiError::Unknown(format!("malformed response: {}", error))
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_critical() {
        assert_eq!(ApiError::Unauthorized.log_level(), LogLevel::Error);
        assert_eq!(ApiError::Forbidden.log_level(), LogLevel::Error);
    }

    #[test]
    fn transient_errors_are_warnings() {
        assert_eq!(
            ApiError::Network("timeout".into()).log_level(),
            LogLevel::Warn
        );
        assert_eq!(ApiError::NotFound.log_level(), LogLevel::Warn);
        assert_eq!(ApiError::Unknown("oops".into()).log_level(), LogLevel::Warn);
    }
}
