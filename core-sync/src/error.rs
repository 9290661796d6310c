use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Sync job {job_id} not found")]
    JobNotFound { job_id: String },

    #[error("A migration job is already running (target {target})")]
    SyncInProgress { target: String },

    #[error("Destination authentication lost: {0}")]
    AuthLost(String),

    #[error("Sync cancelled")]
    Cancelled,

    #[error("Unknown source playlist: {0}")]
    UnknownSourcePlaylist(String),

    #[error("Invalid job ID: {0}")]
    InvalidJobId(String),

    #[error("Invalid sync status: {0}")]
    InvalidStatus(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Catalog error: {0}")]
    Catalog(BridgeError),
}

/// Auth failures get their own variant so the job loop can terminate
/// early on them; everything else from a bridge is a catalog error.
impl From<BridgeError> for SyncError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Auth { reason } => SyncError::AuthLost(reason),
            other => SyncError::Catalog(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_bridge_error_becomes_auth_lost() {
        let err: SyncError = BridgeError::auth("session expired").into();
        assert!(matches!(err, SyncError::AuthLost(_)));

        let err: SyncError = BridgeError::transient("503").into();
        assert!(matches!(err, SyncError::Catalog(_)));
    }
}
