//! Migration coordinator
//!
//! Sits above the per-playlist synchronizer and runs whole migration
//! jobs on background tasks: one playlist, the liked-songs collection,
//! or every source playlist in sequence. One rate-limit gate spans the
//! whole job, destination playlists are created by name when missing,
//! and a failed playlist never takes down the rest of a full run.
//!
//! One job runs at a time: concurrent jobs against the same
//! destination playlist are unsupported, and serializing everything
//! is the simplest way to guarantee that.

use bridge_traits::catalog::DestinationCatalog;
use bridge_traits::source::SourceLibrary;
use bridge_traits::time::{Clock, SystemClock};
use core_model::{PlaylistHandle, SourcePlaylist, Track};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::config::EngineConfig;
use crate::error::{Result, SyncError};
use crate::events::{EventBus, SyncEvent};
use crate::job::{SyncJob, SyncJobId};
use crate::report::{MigrationReport, SyncReport};
use crate::synchronizer::PlaylistSynchronizer;
use crate::writer::RemoteGate;

/// What a job has been asked to migrate
#[derive(Debug, Clone)]
enum MigrationWork {
    /// One source playlist into a destination playlist; with no
    /// explicit destination, one is found or created by name
    Playlist {
        source_playlist_id: String,
        destination: Option<PlaylistHandle>,
    },
    /// The liked-songs collection
    Liked,
    /// Every source playlist, in enumeration order
    All,
}

struct ActiveMigration {
    job_id: SyncJobId,
    token: CancellationToken,
}

/// Coordinator for migration jobs
pub struct MigrationCoordinator {
    config: EngineConfig,
    source: Arc<dyn SourceLibrary>,
    catalog: Arc<dyn DestinationCatalog>,
    events: EventBus,
    gate: RemoteGate,
    jobs: Arc<Mutex<HashMap<SyncJobId, SyncJob>>>,
    reports: Arc<Mutex<HashMap<SyncJobId, MigrationReport>>>,
    active: Arc<Mutex<Option<ActiveMigration>>>,
}

impl MigrationCoordinator {
    /// Create a coordinator using the system clock
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn SourceLibrary>,
        catalog: Arc<dyn DestinationCatalog>,
        events: EventBus,
    ) -> Self {
        Self::with_clock(config, source, catalog, events, Arc::new(SystemClock))
    }

    /// Create a coordinator with an injected clock (deterministic tests)
    pub fn with_clock(
        config: EngineConfig,
        source: Arc<dyn SourceLibrary>,
        catalog: Arc<dyn DestinationCatalog>,
        events: EventBus,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let gate = RemoteGate::new(config.min_call_delay, clock, config.retry_attempts);
        Self {
            config,
            source,
            catalog,
            events,
            gate,
            jobs: Arc::new(Mutex::new(HashMap::new())),
            reports: Arc::new(Mutex::new(HashMap::new())),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Migrate one source playlist.
    ///
    /// With `destination: None`, a destination playlist with the source
    /// playlist's name is found or created first.
    ///
    /// # Errors
    ///
    /// `SyncInProgress` when a job is already running, `AuthLost` when
    /// the destination session is unusable.
    #[instrument(skip(self))]
    pub async fn migrate_playlist(
        &self,
        source_playlist_id: &str,
        destination: Option<PlaylistHandle>,
    ) -> Result<SyncJobId> {
        self.start_job(
            format!("playlist {}", source_playlist_id),
            MigrationWork::Playlist {
                source_playlist_id: source_playlist_id.to_string(),
                destination,
            },
        )
        .await
    }

    /// Migrate the liked-songs collection into the destination's
    /// liked-songs list
    #[instrument(skip(self))]
    pub async fn migrate_liked_songs(&self) -> Result<SyncJobId> {
        self.start_job("liked songs".to_string(), MigrationWork::Liked)
            .await
    }

    /// Migrate every source playlist in sequence.
    ///
    /// Playlists that fail outright are recorded in the run report and
    /// the rest continue; only authentication loss or cancellation
    /// stops the run.
    #[instrument(skip(self))]
    pub async fn migrate_all_playlists(&self) -> Result<SyncJobId> {
        self.start_job("all playlists".to_string(), MigrationWork::All)
            .await
    }

    /// Request cancellation of a running job.
    ///
    /// Cooperative: the job stops at its next between-track check and
    /// finalizes itself with status `Cancelled`.
    pub async fn cancel(&self, job_id: SyncJobId) -> Result<()> {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(migration) if migration.job_id == job_id => {
                migration.token.cancel();
                info!(%job_id, "cancellation requested");
                Ok(())
            }
            _ => Err(SyncError::JobNotFound {
                job_id: job_id.to_string(),
            }),
        }
    }

    /// Current snapshot of a job
    pub async fn status(&self, job_id: SyncJobId) -> Result<SyncJob> {
        self.jobs
            .lock()
            .await
            .get(&job_id)
            .cloned()
            .ok_or_else(|| SyncError::JobNotFound {
                job_id: job_id.to_string(),
            })
    }

    /// Final report of a finished job, if it produced one
    pub async fn report(&self, job_id: SyncJobId) -> Option<MigrationReport> {
        self.reports.lock().await.get(&job_id).cloned()
    }

    /// Whether a job is currently running
    pub async fn is_active(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Subscribe to progress events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    async fn start_job(&self, target: String, work: MigrationWork) -> Result<SyncJobId> {
        if !self.catalog.auth_state().await.is_usable() {
            return Err(SyncError::AuthLost(
                "no usable destination session".to_string(),
            ));
        }

        let mut active = self.active.lock().await;
        if let Some(running) = active.as_ref() {
            return Err(SyncError::SyncInProgress {
                target: format!("job {}", running.job_id),
            });
        }

        let job = SyncJob::new(target.clone()).start()?;
        let job_id = job.id;
        self.jobs.lock().await.insert(job_id, job);

        let token = CancellationToken::new();
        *active = Some(ActiveMigration {
            job_id,
            token: token.clone(),
        });
        drop(active);

        self.events
            .emit(SyncEvent::Started {
                job_id: job_id.to_string(),
                target: target.clone(),
            })
            .ok();

        let coordinator = self.clone_for_task();
        tokio::spawn(async move {
            let result = coordinator.run_job(job_id, work, token.clone()).await;

            coordinator.active.lock().await.take();
            coordinator
                .finalize_job(job_id, result, token.is_cancelled())
                .await;
        });

        info!(%job_id, %target, "started migration job");
        Ok(job_id)
    }

    /// Clone for background task (avoids Arc<Arc<...>>)
    fn clone_for_task(&self) -> Self {
        Self {
            config: self.config.clone(),
            source: Arc::clone(&self.source),
            catalog: Arc::clone(&self.catalog),
            events: self.events.clone(),
            gate: self.gate.clone(),
            jobs: Arc::clone(&self.jobs),
            reports: Arc::clone(&self.reports),
            active: Arc::clone(&self.active),
        }
    }

    #[instrument(skip(self, work, token), fields(job_id = %job_id))]
    async fn run_job(
        &self,
        job_id: SyncJobId,
        work: MigrationWork,
        token: CancellationToken,
    ) -> Result<MigrationReport> {
        match work {
            MigrationWork::Liked => {
                self.update_job_phase(job_id, "Loading liked songs").await;
                let tracks = self.source.liked_tracks().await?;
                let report = self
                    .sync_collection(tracks, PlaylistHandle::Liked, &token)
                    .await?;
                Ok(MigrationReport::single("liked songs", report))
            }
            MigrationWork::Playlist {
                source_playlist_id,
                destination,
            } => {
                let playlist = self.find_source_playlist(&source_playlist_id).await?;
                self.update_job_phase(job_id, &format!("Syncing {}", playlist.name))
                    .await;

                let dest = match destination {
                    Some(handle) => handle,
                    None => self.ensure_destination(&playlist.name).await?,
                };
                let tracks = self.source.playlist_tracks(&playlist.id).await?;
                let report = self.sync_collection(tracks, dest, &token).await?;
                Ok(MigrationReport::single(playlist.name, report))
            }
            MigrationWork::All => {
                self.update_job_phase(job_id, "Enumerating source playlists")
                    .await;
                let playlists = self.source.playlists().await?;
                let total = playlists.len() as u64;
                let mut run = MigrationReport::new();

                for (index, playlist) in playlists.into_iter().enumerate() {
                    if token.is_cancelled() {
                        info!(completed = index, "full migration cancelled between playlists");
                        break;
                    }

                    self.update_job_progress(
                        job_id,
                        index as u64,
                        total,
                        &format!("Syncing {}", playlist.name),
                    )
                    .await;

                    match self.sync_one_playlist(&playlist, &token).await {
                        Ok(report) => run.push_synced(playlist.name, report),
                        Err(SyncError::AuthLost(reason)) => {
                            return Err(SyncError::AuthLost(reason));
                        }
                        Err(err) => {
                            error!(playlist = %playlist.name, error = %err, "playlist failed, continuing run");
                            run.push_failed(playlist.name, err.to_string());
                        }
                    }
                }

                Ok(run)
            }
        }
    }

    async fn sync_one_playlist(
        &self,
        playlist: &SourcePlaylist,
        token: &CancellationToken,
    ) -> Result<SyncReport> {
        let dest = self.ensure_destination(&playlist.name).await?;
        let tracks = self.source.playlist_tracks(&playlist.id).await?;
        self.sync_collection(tracks, dest, token).await
    }

    async fn sync_collection(
        &self,
        tracks: Vec<Track>,
        destination: PlaylistHandle,
        token: &CancellationToken,
    ) -> Result<SyncReport> {
        let synchronizer = PlaylistSynchronizer::new(
            self.catalog.clone(),
            self.gate.clone(),
            &self.config,
            self.events.clone(),
        );
        synchronizer.sync(tracks, &destination, token).await
    }

    async fn find_source_playlist(&self, source_playlist_id: &str) -> Result<SourcePlaylist> {
        let playlists = self.source.playlists().await?;
        playlists
            .into_iter()
            .find(|p| p.id == source_playlist_id)
            .ok_or_else(|| SyncError::UnknownSourcePlaylist(source_playlist_id.to_string()))
    }

    /// Find a destination playlist by name, creating it when absent
    async fn ensure_destination(&self, name: &str) -> Result<PlaylistHandle> {
        let existing = self
            .gate
            .run("list_playlists", || async {
                self.catalog.list_playlists().await
            })
            .await?;

        if let Some(playlist) = existing.iter().find(|p| p.name.eq_ignore_ascii_case(name)) {
            return Ok(PlaylistHandle::Playlist(playlist.id.clone()));
        }

        let id = self
            .gate
            .run("create_playlist", || async {
                self.catalog
                    .create_playlist(name, "Migrated from the source library")
                    .await
            })
            .await?;

        info!(name, %id, "created destination playlist");
        Ok(PlaylistHandle::Playlist(id))
    }

    async fn update_job_phase(&self, job_id: SyncJobId, phase: &str) {
        let mut jobs = self.jobs.lock().await;
        if let Some(job) = jobs.get_mut(&job_id) {
            let (processed, total) = (job.progress.tracks_processed, job.progress.tracks_total);
            let _ = job.update_progress(processed, total, phase);
        }
    }

    async fn update_job_progress(&self, job_id: SyncJobId, processed: u64, total: u64, phase: &str) {
        let mut jobs = self.jobs.lock().await;
        if let Some(job) = jobs.get_mut(&job_id) {
            let _ = job.update_progress(processed, total, phase);
        }
    }

    /// Move the job to its terminal state and publish the outcome
    async fn finalize_job(
        &self,
        job_id: SyncJobId,
        result: Result<MigrationReport>,
        cancelled: bool,
    ) {
        let mut jobs = self.jobs.lock().await;
        let Some(job) = jobs.remove(&job_id) else {
            warn!(%job_id, "finished job missing from registry");
            return;
        };

        match result {
            Ok(report) => {
                let stats = report.stats();
                let finished = if cancelled { job.cancel() } else { job.complete(stats) };
                match finished {
                    Ok(done) => {
                        jobs.insert(job_id, done);
                    }
                    Err(err) => warn!(%job_id, error = %err, "job finalization rejected"),
                }

                let processed = stats.total_processed();
                self.reports.lock().await.insert(job_id, report);

                if cancelled {
                    self.events
                        .emit(SyncEvent::Cancelled {
                            job_id: job_id.to_string(),
                            processed,
                        })
                        .ok();
                    info!(%job_id, processed, "migration job cancelled");
                } else {
                    self.events
                        .emit(SyncEvent::Completed {
                            job_id: job_id.to_string(),
                            stats,
                        })
                        .ok();
                    info!(%job_id, added = stats.added, "migration job completed");
                }
            }
            Err(err) => {
                error!(%job_id, error = %err, "migration job failed");
                match job.fail(err.to_string()) {
                    Ok(failed) => {
                        jobs.insert(job_id, failed);
                    }
                    Err(transition_err) => {
                        warn!(%job_id, error = %transition_err, "job finalization rejected")
                    }
                }
                self.events
                    .emit(SyncEvent::Failed {
                        job_id: job_id.to_string(),
                        message: err.to_string(),
                    })
                    .ok();
            }
        }
    }
}
