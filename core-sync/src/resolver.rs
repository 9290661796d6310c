//! Per-track resolution across escalating match tiers
//!
//! For one source track the resolver walks the tier sequence bounded
//! by the configured maximum: build a query from the canonical title
//! and primary artist, call the destination search once for the tier,
//! score the candidates, and stop at the first tier that produces an
//! acceptable result. Ambiguity is settled here by the deterministic
//! secondary rule (duration agreement, then provider rank) and logged
//! as a soft warning; the verdict in the report stays ambiguous.

use bridge_traits::catalog::{DestinationCatalog, SearchScope};
use bridge_traits::error::Result as BridgeResult;
use core_match::{
    matcher::durations_agree, normalize_track, MatchTier, MatchVerdict, Matcher, NormalizedTrack,
    ScoredCandidate,
};
use core_model::{Candidate, Track};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::writer::RemoteGate;

/// Outcome of resolving one source track
#[derive(Debug, Clone)]
pub struct ResolvedTrack {
    /// The matcher's verdict, recorded verbatim in the report
    pub verdict: MatchVerdict,
    /// The candidate to act on: the match, or the tie-break pick for
    /// an ambiguous verdict. `None` when nothing matched.
    pub choice: Option<Candidate>,
}

/// Tier-escalation resolver for single tracks
pub struct Resolver {
    catalog: Arc<dyn DestinationCatalog>,
    gate: RemoteGate,
    matcher: Matcher,
    max_tier: MatchTier,
    search_limit: u32,
}

impl Resolver {
    pub fn new(
        catalog: Arc<dyn DestinationCatalog>,
        gate: RemoteGate,
        matcher: Matcher,
        max_tier: MatchTier,
        search_limit: u32,
    ) -> Self {
        Self {
            catalog,
            gate,
            matcher,
            max_tier,
            search_limit,
        }
    }

    /// Search query for a track: canonical title plus primary artist
    fn build_query(source: &NormalizedTrack) -> String {
        format!("{} {}", source.title, source.primary_artist)
            .trim()
            .to_string()
    }

    /// Resolve one track against the destination catalog.
    ///
    /// # Errors
    ///
    /// Surfaces search failures (permanent immediately, transient after
    /// the gate's retries are exhausted); the caller records them and
    /// moves on to the next track.
    #[instrument(skip(self, track), fields(track = %track.label()))]
    pub async fn resolve(&self, track: &Track) -> BridgeResult<ResolvedTrack> {
        let source = normalize_track(track);
        let query = Self::build_query(&source);

        for &tier in MatchTier::up_to(self.max_tier) {
            let scope = if tier.includes_videos() {
                SearchScope::SongsAndVideos
            } else {
                SearchScope::Songs
            };

            let candidates = self
                .gate
                .run("search", || async {
                    self.catalog.search(&query, scope, self.search_limit).await
                })
                .await?;

            match self.matcher.evaluate(&source, &candidates, tier) {
                MatchVerdict::NoMatch => {
                    debug!(%tier, candidates = candidates.len(), "no acceptable candidate");
                    continue;
                }
                MatchVerdict::Matched {
                    candidate,
                    tier,
                    score,
                } => {
                    debug!(%tier, score, destination_id = %candidate.destination_id, "matched");
                    return Ok(ResolvedTrack {
                        choice: Some(candidate.clone()),
                        verdict: MatchVerdict::Matched {
                            candidate,
                            tier,
                            score,
                        },
                    });
                }
                MatchVerdict::Ambiguous { candidates, tier } => {
                    let choice = Self::break_tie(&source, &candidates);
                    warn!(
                        %tier,
                        tied = candidates.len(),
                        chosen = %choice.destination_id,
                        "ambiguous match resolved by tie-break"
                    );
                    return Ok(ResolvedTrack {
                        verdict: MatchVerdict::Ambiguous { candidates, tier },
                        choice: Some(choice),
                    });
                }
            }
        }

        debug!("no match at any tier");
        Ok(ResolvedTrack {
            verdict: MatchVerdict::NoMatch,
            choice: None,
        })
    }

    /// Deterministic secondary rule for tied candidates: prefer one
    /// whose duration agrees with the source, then the candidate the
    /// provider ranked first.
    fn break_tie(source: &NormalizedTrack, tied: &[ScoredCandidate]) -> Candidate {
        if let Some(source_duration) = source.duration {
            let duration_pick = tied
                .iter()
                .filter(|s| {
                    s.candidate
                        .track
                        .duration
                        .map(|d| durations_agree(source_duration, d))
                        .unwrap_or(false)
                })
                .min_by_key(|s| s.rank);
            if let Some(pick) = duration_pick {
                return pick.candidate.clone();
            }
        }

        tied.iter()
            .min_by_key(|s| s.rank)
            .expect("ambiguous verdict always carries candidates")
            .candidate
            .clone()
    }
}
