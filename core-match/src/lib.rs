//! # Track Matching
//!
//! Canonicalization and scoring for cross-catalog track resolution.
//!
//! ## Overview
//!
//! Two catalogs describe the same recording with different
//! capitalization, punctuation, featured-artist placement, and
//! remaster/live annotations. This crate turns both sides into
//! comparable canonical text ([`normalize`]) and scores destination
//! candidates against a source track under one of three escalating
//! strictness tiers ([`Matcher`]).
//!
//! Everything here is pure and synchronous: no I/O, no clocks, no
//! shared state. Given the same inputs, verdicts are identical across
//! runs, which is the property the sync report's reproducibility
//! rests on.

pub mod matcher;
pub mod normalize;

pub use matcher::{MatchTier, MatchVerdict, Matcher, ScoredCandidate};
pub use normalize::{normalize, normalize_track, NormalizedTrack};
