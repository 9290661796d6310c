//! Shared failure taxonomy for remote-service bridges
//!
//! The split that matters to the engine is retryable vs. not: transient
//! failures (network, throttling, 5xx) are retried by the rate-limited
//! writer, everything else surfaces immediately.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// Network failure, throttling, or server-side error. Retryable.
    #[error("transient service failure: {reason}")]
    Transient {
        reason: String,
        /// Server-requested wait, when the service sent one (429)
        retry_after_secs: Option<u64>,
    },

    /// Malformed request or any other client-side rejection. Not retryable.
    #[error("permanent service failure: {reason}")]
    Permanent { reason: String },

    /// Authentication is missing, invalid, or expired. Aborts the job.
    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    /// The service refused an addition because the entry already exists.
    #[error("entry already present on the destination")]
    Duplicate,

    /// The service answered but the payload could not be decoded.
    #[error("malformed service response: {0}")]
    Serialization(String),

    /// The bridge implementation does not support this capability.
    #[error("capability not available: {0}")]
    NotAvailable(String),
}

impl BridgeError {
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Transient {
            reason: reason.into(),
            retry_after_secs: None,
        }
    }

    pub fn permanent(reason: impl Into<String>) -> Self {
        Self::Permanent {
            reason: reason.into(),
        }
    }

    pub fn auth(reason: impl Into<String>) -> Self {
        Self::Auth {
            reason: reason.into(),
        }
    }

    /// Whether a retry with backoff could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, BridgeError::Transient { .. })
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(BridgeError::transient("timeout").is_retryable());
        assert!(!BridgeError::permanent("bad query").is_retryable());
        assert!(!BridgeError::auth("expired").is_retryable());
        assert!(!BridgeError::Duplicate.is_retryable());
        assert!(!BridgeError::Serialization("truncated".into()).is_retryable());
    }

    #[test]
    fn test_display_carries_reason() {
        let err = BridgeError::transient("503 from upstream");
        assert!(err.to_string().contains("503 from upstream"));
    }
}
