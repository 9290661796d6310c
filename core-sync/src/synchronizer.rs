//! Per-playlist sync loop
//!
//! Consumes source tracks in input order, resolves each against the
//! destination, and applies additions idempotently. Membership is
//! snapshotted once at the start of the run, so a re-run of an
//! interrupted migration skips everything already applied. No single
//! track's failure stops the batch; only authentication loss does.

use bridge_traits::catalog::DestinationCatalog;
use bridge_traits::error::BridgeError;
use core_match::{MatchVerdict, Matcher};
use core_model::{Candidate, DestTrackId, PlaylistHandle, Track};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::config::EngineConfig;
use crate::error::{Result, SyncError};
use crate::events::{EventBus, SyncEvent};
use crate::report::{SyncReport, WriteOutcome};
use crate::resolver::Resolver;
use crate::writer::{RateLimitedWriter, RemoteGate};

/// One-playlist synchronizer
///
/// Owns a resolver and a writer wired to the same [`RemoteGate`], so
/// the read and write paths share one rate limit.
pub struct PlaylistSynchronizer {
    catalog: Arc<dyn DestinationCatalog>,
    resolver: Resolver,
    writer: RateLimitedWriter,
    dry_run: bool,
    events: EventBus,
}

impl PlaylistSynchronizer {
    pub fn new(
        catalog: Arc<dyn DestinationCatalog>,
        gate: RemoteGate,
        config: &EngineConfig,
        events: EventBus,
    ) -> Self {
        let resolver = Resolver::new(
            catalog.clone(),
            gate.clone(),
            Matcher::new(),
            config.max_tier,
            config.search_limit,
        );
        let writer = RateLimitedWriter::new(catalog.clone(), gate);

        Self {
            catalog,
            resolver,
            writer,
            dry_run: config.dry_run,
            events,
        }
    }

    /// Sync a track sequence into a destination playlist.
    ///
    /// Fetches the membership snapshot (once), then delegates to
    /// [`sync_with_members`](Self::sync_with_members).
    #[instrument(skip(self, tracks, cancel), fields(destination = %destination, tracks = tracks.len()))]
    pub async fn sync(
        &self,
        tracks: Vec<Track>,
        destination: &PlaylistHandle,
        cancel: &CancellationToken,
    ) -> Result<SyncReport> {
        let members = self
            .writer
            .gate()
            .run("playlist_members", || async {
                self.catalog.playlist_members(destination).await
            })
            .await?;

        self.sync_with_members(tracks, destination, members, cancel)
            .await
    }

    /// Sync with a caller-supplied membership snapshot.
    ///
    /// Cancellation is cooperative and checked between tracks; on
    /// cancellation the report accumulated so far comes back with
    /// status `Cancelled`. Already-applied writes are not rolled back.
    ///
    /// # Errors
    ///
    /// Only authentication loss aborts the run; every other failure is
    /// recorded per track and the loop continues.
    pub async fn sync_with_members(
        &self,
        tracks: Vec<Track>,
        destination: &PlaylistHandle,
        mut members: HashSet<DestTrackId>,
        cancel: &CancellationToken,
    ) -> Result<SyncReport> {
        let total = tracks.len() as u64;
        let mut report = SyncReport::new(destination.clone());
        let target = destination.to_string();

        info!(total, existing_members = members.len(), "starting playlist sync");

        for track in tracks {
            if cancel.is_cancelled() {
                info!(processed = report.len(), "sync cancelled between tracks");
                report.mark_cancelled();
                return Ok(report);
            }

            let (verdict, outcome) = match self.resolver.resolve(&track).await {
                Ok(resolved) => {
                    let outcome = self
                        .apply(&resolved.choice, destination, &mut members)
                        .await?;
                    (resolved.verdict, outcome)
                }
                Err(BridgeError::Auth { reason }) => return Err(SyncError::AuthLost(reason)),
                Err(err) => {
                    // The track is lost to an operational failure, not a
                    // catalog gap; record it and keep the batch moving
                    warn!(track = %track.label(), error = %err, "resolution failed");
                    (
                        MatchVerdict::NoMatch,
                        WriteOutcome::WriteFailed {
                            reason: err.to_string(),
                        },
                    )
                }
            };

            self.events
                .emit(SyncEvent::TrackResolved {
                    target: target.clone(),
                    track: track.label(),
                    matched: !verdict.is_no_match(),
                    tier: verdict.tier(),
                })
                .ok();

            report.push(track, verdict, outcome);

            let processed = report.len() as u64;
            self.events
                .emit(SyncEvent::Progress {
                    target: target.clone(),
                    processed,
                    total,
                    percent: if total > 0 {
                        ((processed as f64 / total as f64) * 100.0) as u8
                    } else {
                        0
                    },
                })
                .ok();
        }

        let stats = report.stats();
        info!(
            added = stats.added,
            already_present = stats.already_present,
            skipped = stats.skipped,
            failed = stats.failed,
            unmatched = stats.unmatched,
            "playlist sync complete"
        );

        Ok(report)
    }

    /// Apply one resolved choice to the destination
    async fn apply(
        &self,
        choice: &Option<Candidate>,
        destination: &PlaylistHandle,
        members: &mut HashSet<DestTrackId>,
    ) -> Result<WriteOutcome> {
        let candidate = match choice {
            None => return Ok(WriteOutcome::Skipped),
            Some(candidate) => candidate,
        };

        // Dedup/resume: never re-add what the snapshot already holds
        if members.contains(&candidate.destination_id) {
            return Ok(WriteOutcome::AlreadyPresent);
        }

        if self.dry_run {
            return Ok(WriteOutcome::Skipped);
        }

        match self
            .writer
            .add_track(destination, &candidate.destination_id)
            .await
        {
            Ok(()) => {
                members.insert(candidate.destination_id.clone());
                Ok(WriteOutcome::Added)
            }
            // The playlist mutated underneath us; the track is already there
            Err(BridgeError::Duplicate) => {
                members.insert(candidate.destination_id.clone());
                Ok(WriteOutcome::AlreadyPresent)
            }
            Err(BridgeError::Auth { reason }) => Err(SyncError::AuthLost(reason)),
            Err(err) => Ok(WriteOutcome::WriteFailed {
                reason: err.to_string(),
            }),
        }
    }
}
