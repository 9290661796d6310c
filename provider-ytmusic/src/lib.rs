//! # YouTube Music Provider
//!
//! Implements the `DestinationCatalog` trait against the YouTube Music
//! web API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Catalog search with songs-only or songs-and-videos scope
//! - Result-kind classification from the service's video-type tags
//! - Paginated playlist and liked-songs membership
//! - Single-track additions with duplicate detection
//! - Playlist listing and creation
//! - Session-state probing for the engine's auth precheck
//!
//! Authentication material (cookie and derived authorization header)
//! comes from the host's login flow; acquiring it is out of scope
//! here. Retries are also absent on purpose: the engine's rate-limited
//! writer owns retry policy.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::YtMusicConnector;
pub use error::{Result, YtMusicError};
