//! Error types for the YouTube Music provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// YouTube Music provider errors
#[derive(Error, Debug)]
pub enum YtMusicError {
    /// Session cookie or authorization header was rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The service refused a playlist addition as a duplicate
    #[error("Track already present in playlist")]
    DuplicateEntry,

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_seconds:?} seconds")]
    RateLimited { retry_after_seconds: Option<u64> },

    /// Server-side failure (5xx)
    #[error("YouTube Music unavailable (status {status_code}): {message}")]
    ServiceUnavailable { status_code: u16, message: String },

    /// API request returned a client error
    #[error("YouTube Music API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error (transport-level)
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for YouTube Music operations
pub type Result<T> = std::result::Result<T, YtMusicError>;

impl From<YtMusicError> for BridgeError {
    fn from(error: YtMusicError) -> Self {
        match error {
            YtMusicError::AuthenticationFailed(reason) => BridgeError::Auth { reason },
            YtMusicError::DuplicateEntry => BridgeError::Duplicate,
            YtMusicError::RateLimited {
                retry_after_seconds,
            } => BridgeError::Transient {
                reason: "rate limited".to_string(),
                retry_after_secs: retry_after_seconds,
            },
            YtMusicError::ServiceUnavailable {
                status_code,
                message,
            } => BridgeError::transient(format!("status {}: {}", status_code, message)),
            YtMusicError::ApiError {
                status_code,
                message,
            } => BridgeError::permanent(format!("status {}: {}", status_code, message)),
            YtMusicError::ParseError(message) => BridgeError::Serialization(message),
            YtMusicError::BridgeError(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_mapping() {
        let auth: BridgeError = YtMusicError::AuthenticationFailed("expired".into()).into();
        assert!(matches!(auth, BridgeError::Auth { .. }));

        let dup: BridgeError = YtMusicError::DuplicateEntry.into();
        assert!(matches!(dup, BridgeError::Duplicate));

        let throttled: BridgeError = YtMusicError::RateLimited {
            retry_after_seconds: Some(30),
        }
        .into();
        assert!(throttled.is_retryable());

        let outage: BridgeError = YtMusicError::ServiceUnavailable {
            status_code: 503,
            message: "maintenance".into(),
        }
        .into();
        assert!(outage.is_retryable());

        let client: BridgeError = YtMusicError::ApiError {
            status_code: 400,
            message: "bad query".into(),
        }
        .into();
        assert!(!client.is_retryable());
    }
}
