//! # Sync Engine
//!
//! The track-resolution and playlist-synchronization engine.
//!
//! ## Overview
//!
//! Given a sequence of source tracks and a destination playlist
//! handle, the engine:
//! - resolves each source track to its best destination counterpart
//!   through escalating match tiers (`resolver`)
//! - applies additions idempotently, skipping tracks already present
//!   so interrupted runs can be re-run safely (`synchronizer`)
//! - serializes every remote call behind a minimum-delay gate with
//!   bounded retry on transient failures (`writer`)
//! - records every verdict and write outcome in a deterministic,
//!   inspectable report (`report`)
//!
//! ## Components
//!
//! - **Resolver** (`resolver`): per-track tier escalation state machine
//! - **Playlist Synchronizer** (`synchronizer`): per-playlist sync loop
//!   with dedup/resume and cooperative cancellation
//! - **Rate-Limited Writer** (`writer`): min-delay gate plus
//!   retry-with-backoff around destination mutations
//! - **Migration Coordinator** (`coordinator`): multi-playlist jobs on
//!   background tasks, with the job state machine from `job`
//! - **Events** (`events`): broadcast progress stream for host UIs

pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod job;
pub mod report;
pub mod resolver;
pub mod synchronizer;
pub mod writer;

pub use config::EngineConfig;
pub use coordinator::MigrationCoordinator;
pub use error::{Result, SyncError};
pub use events::{EventBus, SyncEvent};
pub use job::{SyncJob, SyncJobId, SyncProgress, SyncStatus};
pub use report::{
    MigrationReport, PlaylistMigration, PlaylistOutcome, RunStatus, SyncReport, SyncStats,
    TrackReport, WriteOutcome,
};
pub use resolver::{ResolvedTrack, Resolver};
pub use synchronizer::PlaylistSynchronizer;
pub use writer::{RateLimitedWriter, RateLimiter, RemoteGate};
