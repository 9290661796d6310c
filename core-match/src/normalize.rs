//! Canonicalization of track metadata for comparison
//!
//! Titles are stripped of the annotations catalogs disagree on
//! (remaster years, live tags, version suffixes, featured-artist
//! clauses), folded to ASCII, lowercased, and reduced to
//! space-separated alphanumeric tokens. Featured artists are captured
//! before stripping so they can strengthen artist comparison instead
//! of polluting title comparison.
//!
//! `normalize` is idempotent: its output passes through unchanged.

use any_ascii::any_ascii;
use core_model::Track;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

/// Title noise patterns, applied in order before folding.
///
/// All patterns anchor on brackets or dash separators so that already
/// folded text (which has neither) is left alone.
static TITLE_NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Remaster variants: "(Remastered 2011)", "[2009 Remaster]", "- Remastered"
        Regex::new(r"(?i)\s*[(\[](?:\d{4}\s+)?remaster(?:ed)?(?:\s+\d{4})?[)\]]").unwrap(),
        Regex::new(r"(?i)\s*[-–—]\s*(?:\d{4}\s+)?remaster(?:ed)?(?:\s+\d{4})?\s*$").unwrap(),
        // Live tags: "(Live)", "(Live at Wembley)", "- Live in Paris"
        Regex::new(r"(?i)\s*[(\[]live(?:\s+(?:at|from|in)\s+[^)\]]*)?[)\]]").unwrap(),
        Regex::new(r"(?i)\s*[-–—]\s*live(?:\s+(?:at|from|in)\s+.*)?$").unwrap(),
        // Version/edit/mix variants: "(Radio Edit)", "[Single Version]", "(Mono)"
        Regex::new(
            r"(?i)\s*[(\[][^)\]]*(?:version|edit|remix|mix|mono|stereo|demo|acoustic)[)\]]",
        )
        .unwrap(),
        Regex::new(r"(?i)\s*[-–—]\s*[^-–—]*(?:version|edit|remix|mix|mono|stereo)\s*$").unwrap(),
        // Featured artists: "(feat. Artist)", "ft. Someone"; names are
        // extracted separately by `extract_featured` before this runs
        Regex::new(r"(?i)\s*[(\[](?:feat\.?|ft\.?|featuring)\s+[^)\]]*[)\]]").unwrap(),
        Regex::new(r"(?i)\s+(?:feat\.?|ft\.?|featuring)\s+.+$").unwrap(),
    ]
});

/// Bracketed featured-artist clause: "(feat. X)", "[ft. X & Y]"
static FEAT_BRACKETED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[(\[]\s*(?:feat\.?|ft\.?|featuring)\s+([^)\]]+)[)\]]").unwrap()
});

/// Trailing featured-artist clause: "Song feat. X". The leading
/// whitespace requirement keeps words that merely end in "ft" intact.
static FEAT_TRAILING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:feat\.?|ft\.?|featuring)\s+(.+)$").unwrap());

/// Separators between credited artists in a joined name string
static ARTIST_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:[&,/]|(?:\s+(?:and|x|vs\.?|with)\s+))\s*").unwrap()
});

/// Canonicalize a metadata string for comparison.
///
/// Strips known noise annotations, folds to ASCII, lowercases, and
/// collapses everything that is not alphanumeric into single spaces.
/// Pure, deterministic, and idempotent.
pub fn normalize(text: &str) -> String {
    let mut stripped = text.to_string();
    for pattern in TITLE_NOISE_PATTERNS.iter() {
        stripped = pattern.replace_all(&stripped, "").into_owned();
    }
    fold(&stripped)
}

/// ASCII fold, lowercase, and reduce to alphanumeric tokens
fn fold(text: &str) -> String {
    let ascii = any_ascii(text);
    let lowered = ascii.to_lowercase();
    let spaced: String = lowered
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a joined artist-name string and normalize each name
fn split_artists(names: &str) -> Vec<String> {
    ARTIST_SEPARATOR
        .split(names)
        .map(normalize)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Extract featured artists from a title.
///
/// Returns the title with the featuring clause removed plus the
/// normalized featured names, so the caller can fold them into artist
/// comparison.
pub fn extract_featured(title: &str) -> (String, Vec<String>) {
    for pattern in [&*FEAT_BRACKETED, &*FEAT_TRAILING] {
        if let Some(caps) = pattern.captures(title) {
            let names = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let featured = split_artists(names);
            let stripped = pattern.replace(title, "").trim().to_string();
            return (stripped, featured);
        }
    }
    (title.to_string(), Vec::new())
}

/// Read-only canonical view of a track, derived fresh per comparison.
///
/// Never written back onto the `Track` it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTrack {
    /// Canonical title, featuring clause and noise annotations removed
    pub title: String,
    /// Canonical first-credited artist
    pub primary_artist: String,
    /// Full artist pool: primary, additional, and featured, deduped
    pub artists: Vec<String>,
    /// Canonical album title, when present and non-empty after folding
    pub album: Option<String>,
    /// Copied through for duration comparison
    pub duration: Option<Duration>,
}

/// Build the canonical comparison view of a track
pub fn normalize_track(track: &Track) -> NormalizedTrack {
    let (bare_title, featured) = extract_featured(&track.title);
    let primary_artist = normalize(&track.primary_artist);

    let mut artists = vec![primary_artist.clone()];
    for name in track
        .additional_artists
        .iter()
        .map(|a| normalize(a))
        .chain(featured)
    {
        if !name.is_empty() && !artists.contains(&name) {
            artists.push(name);
        }
    }

    NormalizedTrack {
        title: normalize(&bare_title),
        primary_artist,
        artists,
        album: track
            .album
            .as_deref()
            .map(normalize)
            .filter(|album| !album.is_empty()),
        duration: track.duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Don't Stop Me Now!"), "don t stop me now");
        assert_eq!(normalize("  Multiple   Spaces  "), "multiple spaces");
    }

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(normalize("Café"), "cafe");
        assert_eq!(normalize("Beyoncé"), "beyonce");
        assert_eq!(normalize("Sigur Rós"), "sigur ros");
    }

    #[test]
    fn test_strips_noise_suffixes() {
        assert_eq!(normalize("Song (Remastered 2011)"), "song");
        assert_eq!(normalize("Song - Remastered"), "song");
        assert_eq!(normalize("Song (Live at Wembley)"), "song");
        assert_eq!(normalize("Song - Radio Edit"), "song");
        assert_eq!(normalize("Song [Single Version]"), "song");
        assert_eq!(normalize("Song (feat. Somebody)"), "song");
    }

    #[test]
    fn test_diacritic_live_remaster_share_core_token() {
        assert_eq!(normalize("Café — Live (Remastered)"), normalize("cafe"));
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "Café — Live (Remastered)",
            "Song (feat. A & B) [2009 Remaster]",
            "Smells Like Teen Spirit",
            "AC/DC - Back In Black - Live",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_plain_words_survive() {
        // Noise words without bracket/dash anchors are content, not noise
        assert_eq!(normalize("Live And Let Die"), "live and let die");
        assert_eq!(normalize("Love Me Do"), "love me do");
    }

    #[test]
    fn test_extract_featured_bracketed() {
        let (title, featured) = extract_featured("Airplanes (feat. Hayley Williams)");
        assert_eq!(title, "Airplanes");
        assert_eq!(featured, vec!["hayley williams"]);
    }

    #[test]
    fn test_extract_featured_multiple_names() {
        let (title, featured) = extract_featured("Song ft. First Artist & Second Artist");
        assert_eq!(title, "Song");
        assert_eq!(featured, vec!["first artist", "second artist"]);
    }

    #[test]
    fn test_extract_featured_absent() {
        let (title, featured) = extract_featured("Paranoid Android");
        assert_eq!(title, "Paranoid Android");
        assert!(featured.is_empty());
    }

    #[test]
    fn test_extract_featured_ignores_ft_inside_words() {
        let (title, featured) = extract_featured("Swift Horses");
        assert_eq!(title, "Swift Horses");
        assert!(featured.is_empty());
    }

    #[test]
    fn test_normalize_track_merges_artist_pool() {
        let track = Track::new("Airplanes (feat. Hayley Williams)", "B.o.B")
            .with_additional_artists(vec!["Hayley Williams".to_string()]);
        let normalized = normalize_track(&track);

        assert_eq!(normalized.title, "airplanes");
        assert_eq!(normalized.primary_artist, "b o b");
        // Featured name collapses into the pool without duplication
        assert_eq!(
            normalized.artists,
            vec!["b o b".to_string(), "hayley williams".to_string()]
        );
    }

    #[test]
    fn test_normalize_track_empty_album_dropped() {
        let track = Track::new("Song", "Artist").with_album("—");
        assert_eq!(normalize_track(&track).album, None);
    }
}
