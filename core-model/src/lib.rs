//! # Domain Model
//!
//! Value types shared across the migration engine: source tracks,
//! destination candidates, and the opaque remote handles used to
//! address playlists and tracks on the destination service.
//!
//! Everything in this crate is a plain immutable value. The engine
//! never compares two tracks by identity; equality across catalogs is
//! always mediated by the matcher.

pub mod ids;
pub mod track;

pub use ids::{DestTrackId, PlaylistHandle, PlaylistId};
pub use track::{Candidate, RemotePlaylist, ResultKind, SourcePlaylist, Track};
