//! Season/episode extraction from filenames
//!
//! Recognizes the common `S01E02` marker anywhere in a filename.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern for the S01E01 marker (letters case-insensitive, one or more ASCII digits each)
static SXXEXX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[Ss]([0-9]+)[Ee]([0-9]+)").unwrap());

/// Season and episode numbers parsed from a filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeNumber {
    /// Season number as written in the filename
    pub season: u32,
    /// Episode number as written in the filename
    pub episode: u32,
}

/// Extracts season and episode numbers from a filename
///
/// Only the leftmost `S<digits>E<digits>` occurrence is considered. Leading
/// zeros are accepted (`S01E002` is season 1, episode 2).
///
/// Returns `None` when the filename carries no marker, or when the digits
/// do not fit into a `u32`.
///
/// # Examples
///
/// ```
/// use media_organizer::{parse_episode_info, EpisodeNumber};
///
/// assert_eq!(
///     parse_episode_info("Office.S01E02.mkv"),
///     Some(EpisodeNumber { season: 1, episode: 2 })
/// );
/// assert_eq!(parse_episode_info("random.mp4"), None);
/// ```
pub fn parse_episode_info(filename: &str) -> Option<EpisodeNumber> {
    let caps = SXXEXX_RE.captures(filename)?;
    let season = caps.get(1)?.as_str().parse().ok()?;
    let episode = caps.get(2)?.as_str().parse().ok()?;

    Some(EpisodeNumber { season, episode })
}
