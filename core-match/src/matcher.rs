//! Tiered candidate scoring
//!
//! A candidate is scored against a source track under one of three
//! strictness tiers. `Exact` demands canonical string equality and an
//! official recording; the fuzzy tiers blend Jaro-Winkler similarities
//! over title, artist, and album, with a duration penalty separating
//! different recordings that share identical text metadata.

use core_model::{Candidate, ResultKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use strsim::jaro_winkler;

use crate::normalize::{normalize_track, NormalizedTrack};

/// Duration difference always tolerated, in seconds
const DURATION_TOLERANCE_SECS: f64 = 3.0;

/// Tolerated difference grows with track length (2% of the shorter side)
const DURATION_TOLERANCE_RATIO: f64 = 0.02;

/// Score multiplier when durations disagree beyond tolerance
const DURATION_PENALTY: f64 = 0.6;

// ============================================================================
// Tiers
// ============================================================================

/// Matching strictness, ordered strictest to loosest.
///
/// Resolution walks tiers in this order and commits to the first
/// acceptable result; the loosest tier widens result-kind eligibility
/// to videos and user uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Canonical title and primary artist must be string-equal;
    /// official recordings only
    Exact,
    /// Blended similarity over a high threshold; official recordings only
    Fuzzy,
    /// Same threshold as `Fuzzy`, but videos and uploads are eligible
    FuzzyWithVideo,
}

impl MatchTier {
    pub const ALL: [MatchTier; 3] = [MatchTier::Exact, MatchTier::Fuzzy, MatchTier::FuzzyWithVideo];

    /// The escalation sequence bounded by a configured maximum tier
    pub fn up_to(max: MatchTier) -> &'static [MatchTier] {
        match max {
            MatchTier::Exact => &[MatchTier::Exact],
            MatchTier::Fuzzy => &[MatchTier::Exact, MatchTier::Fuzzy],
            MatchTier::FuzzyWithVideo => {
                &[MatchTier::Exact, MatchTier::Fuzzy, MatchTier::FuzzyWithVideo]
            }
        }
    }

    /// Whether a result of the given kind is eligible under this tier
    pub fn allows(&self, kind: ResultKind) -> bool {
        match self {
            MatchTier::FuzzyWithVideo => true,
            _ => kind.is_official_recording(),
        }
    }

    /// Whether searches under this tier should include video results
    pub fn includes_videos(&self) -> bool {
        matches!(self, MatchTier::FuzzyWithVideo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Fuzzy => "fuzzy",
            MatchTier::FuzzyWithVideo => "fuzzy_with_video",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(MatchTier::Exact),
            "fuzzy" => Ok(MatchTier::Fuzzy),
            "fuzzy_with_video" => Ok(MatchTier::FuzzyWithVideo),
            _ => Err(format!("unknown match tier: {}", s)),
        }
    }
}

// ============================================================================
// Verdicts
// ============================================================================

/// A candidate with its score and original provider rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    /// Position in the provider's relevance ordering (0 = first)
    pub rank: usize,
}

/// Outcome of evaluating one tier's candidates against a source track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchVerdict {
    /// A single candidate cleared the tier's bar
    Matched {
        candidate: Candidate,
        tier: MatchTier,
        score: f64,
    },
    /// The top candidates tied within the ambiguity epsilon; the
    /// resolver applies the deterministic secondary rule
    Ambiguous {
        candidates: Vec<ScoredCandidate>,
        tier: MatchTier,
    },
    /// Nothing cleared the bar at this tier
    NoMatch,
}

impl MatchVerdict {
    pub fn is_no_match(&self) -> bool {
        matches!(self, MatchVerdict::NoMatch)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MatchVerdict::Ambiguous { .. })
    }

    /// The tier the verdict was produced under, when there is one
    pub fn tier(&self) -> Option<MatchTier> {
        match self {
            MatchVerdict::Matched { tier, .. } | MatchVerdict::Ambiguous { tier, .. } => {
                Some(*tier)
            }
            MatchVerdict::NoMatch => None,
        }
    }
}

// ============================================================================
// Matcher
// ============================================================================

/// Candidate scorer with tunable weights and thresholds.
///
/// The defaults are engineering estimates meant to be tuned against a
/// labeled catalog pair, not constants with provenance.
#[derive(Debug, Clone)]
pub struct Matcher {
    title_weight: f64,
    artist_weight: f64,
    album_weight: f64,
    fuzzy_threshold: f64,
    ambiguity_epsilon: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            title_weight: 0.6,
            artist_weight: 0.3,
            album_weight: 0.1,
            fuzzy_threshold: 0.85,
            ambiguity_epsilon: 0.02,
        }
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the fuzzy acceptance threshold
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Override the ambiguity epsilon
    pub fn with_ambiguity_epsilon(mut self, epsilon: f64) -> Self {
        self.ambiguity_epsilon = epsilon;
        self
    }

    /// Similarity of one candidate to the source under a tier, in [0, 1].
    ///
    /// Under `Exact` the score is binary: 1.0 on canonical equality of
    /// title and primary artist, 0.0 otherwise.
    pub fn score(&self, source: &NormalizedTrack, candidate: &Candidate, tier: MatchTier) -> f64 {
        let cand = normalize_track(&candidate.track);
        match tier {
            MatchTier::Exact => {
                if !source.title.is_empty()
                    && source.title == cand.title
                    && source.primary_artist == cand.primary_artist
                {
                    1.0
                } else {
                    0.0
                }
            }
            MatchTier::Fuzzy | MatchTier::FuzzyWithVideo => self.blended_score(source, &cand),
        }
    }

    /// Evaluate a tier's candidate list and produce a verdict.
    ///
    /// Candidates whose result kind the tier rejects are filtered out
    /// before scoring. Among those clearing the threshold the highest
    /// score wins; a runner-up within the epsilon makes the verdict
    /// `Ambiguous` instead of silently picking one.
    pub fn evaluate(
        &self,
        source: &NormalizedTrack,
        candidates: &[Candidate],
        tier: MatchTier,
    ) -> MatchVerdict {
        let threshold = match tier {
            MatchTier::Exact => 1.0,
            _ => self.fuzzy_threshold,
        };

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| tier.allows(c.result_kind))
            .map(|(rank, c)| ScoredCandidate {
                score: self.score(source, c, tier),
                candidate: c.clone(),
                rank,
            })
            .filter(|s| s.score >= threshold)
            .collect();

        if scored.is_empty() {
            return MatchVerdict::NoMatch;
        }

        // Stable sort keeps provider rank order among equal scores
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let top = scored[0].score;
        if scored.len() > 1 && top - scored[1].score < self.ambiguity_epsilon {
            let tied: Vec<ScoredCandidate> = scored
                .into_iter()
                .filter(|s| top - s.score < self.ambiguity_epsilon)
                .collect();
            return MatchVerdict::Ambiguous {
                candidates: tied,
                tier,
            };
        }

        let best = scored.remove(0);
        MatchVerdict::Matched {
            candidate: best.candidate,
            tier,
            score: best.score,
        }
    }

    fn blended_score(&self, source: &NormalizedTrack, cand: &NormalizedTrack) -> f64 {
        let title_sim = jaro_winkler(&source.title, &cand.title);
        let artist_sim = self.artist_similarity(source, cand);

        let mut weighted = title_sim * self.title_weight + artist_sim * self.artist_weight;
        let mut weight = self.title_weight + self.artist_weight;

        // Album participates only when both sides carry one; otherwise
        // its weight is redistributed by renormalizing
        if let (Some(a), Some(b)) = (&source.album, &cand.album) {
            weighted += jaro_winkler(a, b) * self.album_weight;
            weight += self.album_weight;
        }

        let mut score = weighted / weight;

        if let (Some(a), Some(b)) = (source.duration, cand.duration) {
            if duration_tolerance_exceeded(a, b) {
                score *= DURATION_PENALTY;
            }
        }

        score
    }

    /// Artist similarity: primary-to-primary dominates, with the full
    /// artist pools (additional plus featured) contributing overlap
    fn artist_similarity(&self, source: &NormalizedTrack, cand: &NormalizedTrack) -> f64 {
        let primary = jaro_winkler(&source.primary_artist, &cand.primary_artist);

        if source.artists.len() <= 1 && cand.artists.len() <= 1 {
            return primary;
        }

        let overlap: f64 = source
            .artists
            .iter()
            .map(|a| {
                cand.artists
                    .iter()
                    .map(|b| jaro_winkler(a, b))
                    .fold(0.0_f64, f64::max)
            })
            .sum::<f64>()
            / source.artists.len() as f64;

        primary * 0.7 + overlap * 0.3
    }
}

/// Whether two durations disagree more than the tolerance allows.
///
/// Tolerance is 3 seconds or 2% of the shorter duration, whichever is
/// larger. Identical text metadata with a large duration gap usually
/// means a different recording.
pub fn duration_tolerance_exceeded(a: Duration, b: Duration) -> bool {
    let a_secs = a.as_secs_f64();
    let b_secs = b.as_secs_f64();
    let allowed = (a_secs.min(b_secs) * DURATION_TOLERANCE_RATIO).max(DURATION_TOLERANCE_SECS);
    (a_secs - b_secs).abs() > allowed
}

/// Whether two durations agree within the tolerance
pub fn durations_agree(a: Duration, b: Duration) -> bool {
    !duration_tolerance_exceeded(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{DestTrackId, Track};

    fn candidate(title: &str, artist: &str, kind: ResultKind, id: &str) -> Candidate {
        Candidate::new(Track::new(title, artist), DestTrackId::new(id), kind)
    }

    fn source(title: &str, artist: &str) -> NormalizedTrack {
        normalize_track(&Track::new(title, artist))
    }

    #[test]
    fn test_tier_escalation_order() {
        assert_eq!(MatchTier::up_to(MatchTier::Exact), &[MatchTier::Exact]);
        assert_eq!(
            MatchTier::up_to(MatchTier::Fuzzy),
            &[MatchTier::Exact, MatchTier::Fuzzy]
        );
        assert_eq!(
            MatchTier::up_to(MatchTier::FuzzyWithVideo),
            &[MatchTier::Exact, MatchTier::Fuzzy, MatchTier::FuzzyWithVideo]
        );
        assert!(MatchTier::Exact < MatchTier::Fuzzy);
        assert!(MatchTier::Fuzzy < MatchTier::FuzzyWithVideo);
    }

    #[test]
    fn test_tier_kind_gates() {
        assert!(MatchTier::Exact.allows(ResultKind::Song));
        assert!(!MatchTier::Exact.allows(ResultKind::Video));
        assert!(!MatchTier::Fuzzy.allows(ResultKind::UserUpload));
        assert!(MatchTier::FuzzyWithVideo.allows(ResultKind::Video));
        assert!(MatchTier::FuzzyWithVideo.allows(ResultKind::UserUpload));
    }

    #[test]
    fn test_tier_round_trip() {
        for tier in MatchTier::ALL {
            assert_eq!(tier.as_str().parse::<MatchTier>().unwrap(), tier);
        }
        assert!("algorithm-2".parse::<MatchTier>().is_err());
    }

    #[test]
    fn test_exact_requires_canonical_equality() {
        let matcher = Matcher::new();
        let src = source("Karma Police", "Radiohead");

        let same = candidate("Karma Police (Remastered)", "radiohead", ResultKind::Song, "a");
        let close = candidate("Karma Police 2", "Radiohead", ResultKind::Song, "b");

        assert_eq!(matcher.score(&src, &same, MatchTier::Exact), 1.0);
        assert_eq!(matcher.score(&src, &close, MatchTier::Exact), 0.0);
    }

    #[test]
    fn test_exact_rejects_video_kinds() {
        let matcher = Matcher::new();
        let src = source("Karma Police", "Radiohead");
        let video = candidate("Karma Police", "Radiohead", ResultKind::Video, "v");

        let verdict = matcher.evaluate(&src, &[video], MatchTier::Exact);
        assert!(verdict.is_no_match());
    }

    #[test]
    fn test_fuzzy_accepts_near_titles() {
        let matcher = Matcher::new();
        let src = source("Smells Like Teen Spirit", "Nirvana");
        let near = candidate("Smells Like Teen Spirits", "Nirvana", ResultKind::Song, "n");

        match matcher.evaluate(&src, &[near], MatchTier::Fuzzy) {
            MatchVerdict::Matched { score, tier, .. } => {
                assert!(score >= 0.85);
                assert_eq!(tier, MatchTier::Fuzzy);
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_fuzzy_rejects_unrelated() {
        let matcher = Matcher::new();
        let src = source("Smells Like Teen Spirit", "Nirvana");
        let unrelated = candidate("Wonderwall", "Oasis", ResultKind::Song, "o");

        assert!(matcher
            .evaluate(&src, &[unrelated], MatchTier::Fuzzy)
            .is_no_match());
    }

    #[test]
    fn test_duration_penalty_separates_recordings() {
        let matcher = Matcher::new();
        let src = normalize_track(
            &Track::new("One", "Metallica").with_duration(Duration::from_secs(447)),
        );
        // Identical text, wildly different length: a different recording
        let long = Candidate::new(
            Track::new("One", "Metallica").with_duration(Duration::from_secs(620)),
            DestTrackId::new("long"),
            ResultKind::Song,
        );
        let right = Candidate::new(
            Track::new("One", "Metallica").with_duration(Duration::from_secs(446)),
            DestTrackId::new("right"),
            ResultKind::Song,
        );

        let penalized = matcher.score(&src, &long, MatchTier::Fuzzy);
        let clean = matcher.score(&src, &right, MatchTier::Fuzzy);
        assert!(penalized < clean);
        assert!(penalized < 0.85, "penalty should push below threshold");
    }

    #[test]
    fn test_ambiguity_epsilon_boundary() {
        let matcher = Matcher::new();
        let src = source("Hallelujah", "Jeff Buckley");

        // Two identical official candidates score identically -> ambiguous
        let a = candidate("Hallelujah", "Jeff Buckley", ResultKind::Song, "a");
        let b = candidate("Hallelujah", "Jeff Buckley", ResultKind::Song, "b");
        let verdict = matcher.evaluate(&src, &[a, b], MatchTier::Fuzzy);
        match verdict {
            MatchVerdict::Ambiguous { ref candidates, .. } => {
                assert_eq!(candidates.len(), 2);
                // Provider rank order is preserved among ties
                assert_eq!(candidates[0].rank, 0);
                assert_eq!(candidates[1].rank, 1);
            }
            other => panic!("expected ambiguous, got {:?}", other),
        }

        // A clearly weaker runner-up is not ambiguous
        let strong = candidate("Hallelujah", "Jeff Buckley", ResultKind::Song, "s");
        let weak = candidate("Hallelujah", "Jess Buckles", ResultKind::Song, "w");
        let verdict = matcher.evaluate(&src, &[strong, weak], MatchTier::Fuzzy);
        assert!(matches!(verdict, MatchVerdict::Matched { .. }));
    }

    #[test]
    fn test_duration_tolerance_scales_with_length() {
        // 3s floor on a short track
        assert!(!duration_tolerance_exceeded(
            Duration::from_secs(120),
            Duration::from_secs(122)
        ));
        assert!(duration_tolerance_exceeded(
            Duration::from_secs(120),
            Duration::from_secs(126)
        ));
        // 2% of a long track beats the floor: 600s -> 12s allowed
        assert!(!duration_tolerance_exceeded(
            Duration::from_secs(600),
            Duration::from_secs(610)
        ));
        assert!(duration_tolerance_exceeded(
            Duration::from_secs(600),
            Duration::from_secs(615)
        ));
    }

    #[test]
    fn test_featured_artists_strengthen_artist_similarity() {
        let matcher = Matcher::new();
        let src = normalize_track(
            &Track::new("Airplanes (feat. Hayley Williams)", "B.o.B"),
        );
        let cand_with_feat = Candidate::new(
            Track::new("Airplanes", "B.o.B")
                .with_additional_artists(vec!["Hayley Williams".to_string()]),
            DestTrackId::new("f"),
            ResultKind::Song,
        );

        match matcher.evaluate(&src, &[cand_with_feat], MatchTier::Fuzzy) {
            MatchVerdict::Matched { score, .. } => assert!(score >= 0.85),
            other => panic!("expected match, got {:?}", other),
        }
    }
}
