//! Migration job state machine
//!
//! Jobs run on background tasks; the state machine keeps transitions
//! honest so a cancelled job can never later report completion.
//!
//! ```text
//! Pending → Running → Completed
//!     ↓         ↓         ↑
//!     └──────→ Failed    │
//!     └──────→ Cancelled │
//! ```

use crate::error::{Result, SyncError};
use crate::report::SyncStats;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a migration job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncJobId(Uuid);

impl SyncJobId {
    /// Create a new random job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a job ID from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self> {
        Ok(Self(
            Uuid::parse_str(s).map_err(|e| SyncError::InvalidJobId(e.to_string()))?,
        ))
    }
}

impl Default for SyncJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SyncJobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Status Types
// ============================================================================

/// The current status of a migration job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Job has been created but not yet started
    Pending,
    /// Job is currently running
    Running,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
    /// Job was cancelled
    Cancelled,
}

impl SyncStatus {
    /// Check if this status represents a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncStatus::Completed | SyncStatus::Failed | SyncStatus::Cancelled
        )
    }

    /// Check if this status represents an active state
    pub fn is_active(&self) -> bool {
        matches!(self, SyncStatus::Pending | SyncStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Running => "running",
            SyncStatus::Completed => "completed",
            SyncStatus::Failed => "failed",
            SyncStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for SyncStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SyncStatus::Pending),
            "running" => Ok(SyncStatus::Running),
            "completed" => Ok(SyncStatus::Completed),
            "failed" => Ok(SyncStatus::Failed),
            "cancelled" => Ok(SyncStatus::Cancelled),
            _ => Err(SyncError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Progress information for a running job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncProgress {
    /// Number of tracks processed so far
    pub tracks_processed: u64,
    /// Total tracks in the job, when known
    pub tracks_total: u64,
    /// Progress percentage (0-100)
    pub percent: u8,
    /// Current phase description
    pub phase: String,
}

impl SyncProgress {
    pub fn new() -> Self {
        Self {
            tracks_processed: 0,
            tracks_total: 0,
            percent: 0,
            phase: "Initializing".to_string(),
        }
    }

    pub fn update(&mut self, processed: u64, total: u64, phase: &str) {
        self.tracks_processed = processed;
        self.tracks_total = total;
        self.phase = phase.to_string();
        self.percent = if total > 0 {
            ((processed as f64 / total as f64) * 100.0).min(100.0) as u8
        } else {
            0
        };
    }
}

impl Default for SyncProgress {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Job Entity
// ============================================================================

/// A migration job with state machine semantics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncJob {
    /// Unique identifier for this job
    pub id: SyncJobId,
    /// Human-readable target description ("liked songs", a playlist
    /// name, or "all playlists")
    pub target: String,
    /// Current status
    pub status: SyncStatus,
    /// Progress information
    pub progress: SyncProgress,
    /// Aggregate counters (only once completed)
    pub stats: Option<SyncStats>,
    /// Error message if failed
    pub error_message: Option<String>,
    /// When the job was created
    pub created_at: i64,
    /// When the job started running
    pub started_at: Option<i64>,
    /// When the job reached a terminal state
    pub completed_at: Option<i64>,
}

impl SyncJob {
    /// Create a new job in pending state
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            id: SyncJobId::new(),
            target: target.into(),
            status: SyncStatus::Pending,
            progress: SyncProgress::new(),
            stats: None,
            error_message: None,
            created_at: current_timestamp(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Start the job
    ///
    /// # Errors
    ///
    /// Returns an error if the job is not in `Pending` state
    pub fn start(mut self) -> Result<Self> {
        self.validate_transition(SyncStatus::Running)?;
        self.status = SyncStatus::Running;
        self.started_at = Some(current_timestamp());
        self.progress.phase = "Starting migration".to_string();
        Ok(self)
    }

    /// Update progress information
    ///
    /// # Errors
    ///
    /// Returns an error if the job is not in `Running` state
    pub fn update_progress(&mut self, processed: u64, total: u64, phase: &str) -> Result<()> {
        if self.status != SyncStatus::Running {
            return Err(SyncError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: "update_progress".to_string(),
                reason: "Job must be running to update progress".to_string(),
            });
        }
        self.progress.update(processed, total, phase);
        Ok(())
    }

    /// Mark the job as completed with aggregate counters
    pub fn complete(mut self, stats: SyncStats) -> Result<Self> {
        self.validate_transition(SyncStatus::Completed)?;
        self.status = SyncStatus::Completed;
        self.completed_at = Some(current_timestamp());
        self.stats = Some(stats);
        self.progress.percent = 100;
        self.progress.phase = "Completed".to_string();
        Ok(self)
    }

    /// Mark the job as failed
    pub fn fail(mut self, error_message: String) -> Result<Self> {
        self.validate_transition(SyncStatus::Failed)?;
        self.status = SyncStatus::Failed;
        self.completed_at = Some(current_timestamp());
        self.error_message = Some(error_message);
        self.progress.phase = "Failed".to_string();
        Ok(self)
    }

    /// Cancel the job; already-applied writes stay applied
    pub fn cancel(mut self) -> Result<Self> {
        self.validate_transition(SyncStatus::Cancelled)?;
        self.status = SyncStatus::Cancelled;
        self.completed_at = Some(current_timestamp());
        self.progress.phase = "Cancelled".to_string();
        Ok(self)
    }

    /// Duration of the job in seconds, once it has started and finished
    pub fn duration_secs(&self) -> Option<u64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some((end - start).max(0) as u64),
            _ => None,
        }
    }

    fn validate_transition(&self, to: SyncStatus) -> Result<()> {
        let valid = match (self.status, to) {
            (SyncStatus::Pending, SyncStatus::Running) => true,
            (SyncStatus::Pending, SyncStatus::Cancelled) => true,
            (SyncStatus::Pending, SyncStatus::Failed) => true,
            (SyncStatus::Running, SyncStatus::Completed) => true,
            (SyncStatus::Running, SyncStatus::Failed) => true,
            (SyncStatus::Running, SyncStatus::Cancelled) => true,
            _ => false,
        };

        if !valid {
            return Err(SyncError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: format!(
                    "Cannot transition from {} to {}",
                    self.status.as_str(),
                    to.as_str()
                ),
            });
        }

        Ok(())
    }
}

/// Get current Unix timestamp
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before UNIX epoch")
        .as_secs() as i64
}

// ============================================================================
// Tests
// ============================================================================
