//! Sync run reports
//!
//! The report is the sole externally observable record of a run:
//! one entry per processed source track, in input order, carrying the
//! final match verdict and the write outcome. Given the same inputs
//! and destination state, a run produces the same report.

use core_match::MatchVerdict;
use core_model::{PlaylistHandle, Track};
use serde::{Deserialize, Serialize};

/// What happened on the write path for one resolved track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Track was added to the destination playlist
    Added,
    /// Track was already a member (dedup/resume, or the service
    /// refused a duplicate add)
    AlreadyPresent,
    /// No write was attempted: no match found, or a dry run
    Skipped,
    /// The write (or the resolution backing it) failed after retries
    WriteFailed { reason: String },
}

impl WriteOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, WriteOutcome::WriteFailed { .. })
    }
}

/// Report entry for one processed source track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackReport {
    pub track: Track,
    pub verdict: MatchVerdict,
    pub outcome: WriteOutcome,
}

/// Terminal state of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every input track was processed
    Completed,
    /// The run stopped at a cancellation check; entries cover only the
    /// tracks processed before it
    Cancelled,
}

/// Aggregate counters over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    pub added: u64,
    pub already_present: u64,
    pub skipped: u64,
    pub failed: u64,
    /// Tracks with no acceptable destination candidate at any tier
    pub unmatched: u64,
}

impl SyncStats {
    pub fn total_processed(&self) -> u64 {
        self.added + self.already_present + self.skipped + self.failed
    }

    pub fn merge(&mut self, other: &SyncStats) {
        self.added += other.added;
        self.already_present += other.already_present;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.unmatched += other.unmatched;
    }
}

/// Record of one playlist sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// The playlist the run targeted
    pub destination: PlaylistHandle,
    /// Per-track results, in source input order
    pub entries: Vec<TrackReport>,
    pub status: RunStatus,
}

impl SyncReport {
    pub fn new(destination: PlaylistHandle) -> Self {
        Self {
            destination,
            entries: Vec::new(),
            status: RunStatus::Completed,
        }
    }

    pub fn push(&mut self, track: Track, verdict: MatchVerdict, outcome: WriteOutcome) {
        self.entries.push(TrackReport {
            track,
            verdict,
            outcome,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mark_cancelled(&mut self) {
        self.status = RunStatus::Cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }

    pub fn stats(&self) -> SyncStats {
        let mut stats = SyncStats::default();
        for entry in &self.entries {
            match &entry.outcome {
                WriteOutcome::Added => stats.added += 1,
                WriteOutcome::AlreadyPresent => stats.already_present += 1,
                WriteOutcome::Skipped => stats.skipped += 1,
                WriteOutcome::WriteFailed { .. } => stats.failed += 1,
            }
            if entry.verdict.is_no_match() {
                stats.unmatched += 1;
            }
        }
        stats
    }
}

/// Result of one playlist within a multi-playlist run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistOutcome {
    Synced(SyncReport),
    /// The playlist could not be synced at all (membership fetch or
    /// destination creation failed); the run continued past it
    Failed { reason: String },
}

/// One playlist's slot in a migration run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistMigration {
    pub source_name: String,
    pub outcome: PlaylistOutcome,
}

/// Report for a whole migration job (one or many playlists)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub playlists: Vec<PlaylistMigration>,
}

impl MigrationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a single playlist's report
    pub fn single(source_name: impl Into<String>, report: SyncReport) -> Self {
        Self {
            playlists: vec![PlaylistMigration {
                source_name: source_name.into(),
                outcome: PlaylistOutcome::Synced(report),
            }],
        }
    }

    pub fn push_synced(&mut self, source_name: impl Into<String>, report: SyncReport) {
        self.playlists.push(PlaylistMigration {
            source_name: source_name.into(),
            outcome: PlaylistOutcome::Synced(report),
        });
    }

    pub fn push_failed(&mut self, source_name: impl Into<String>, reason: impl Into<String>) {
        self.playlists.push(PlaylistMigration {
            source_name: source_name.into(),
            outcome: PlaylistOutcome::Failed {
                reason: reason.into(),
            },
        });
    }

    /// Aggregate track counters across all synced playlists
    pub fn stats(&self) -> SyncStats {
        let mut stats = SyncStats::default();
        for playlist in &self.playlists {
            if let PlaylistOutcome::Synced(report) = &playlist.outcome {
                stats.merge(&report.stats());
            }
        }
        stats
    }

    /// Number of playlists that could not be synced at all
    pub fn failed_playlists(&self) -> usize {
        self.playlists
            .iter()
            .filter(|p| matches!(p.outcome, PlaylistOutcome::Failed { .. }))
            .count()
    }
}
