//! Organizer configuration
//!
//! The defaults reproduce the fixed library layout: raw files under
//! `media-to-sort/The Office (US)`, sorted output under `media/shows` and
//! `media/subtitles`, all relative to the working directory.

use std::path::PathBuf;

/// Default source root holding the `Season <N>` directories
pub const DEFAULT_SOURCE_DIR: &str = "media-to-sort/The Office (US)";

/// Default destination root for videos and season metadata documents
pub const DEFAULT_MEDIA_DIR: &str = "media/shows";

/// Default destination root for subtitles
pub const DEFAULT_SUBTITLES_DIR: &str = "media/subtitles";

/// Video extensions picked up from season directories (without dot)
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi"];

/// Subtitle extensions picked up from `Subs` folders (without dot)
pub const DEFAULT_SUBTITLE_EXTENSIONS: &[&str] = &["srt", "vtt"];

/// Settings for one organize run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerConfig {
    /// Directory containing the `Season <N>` directories
    pub source_dir: PathBuf,
    /// Destination for `season-NN/episode-NN.<ext>` videos and `season_<N>.json`
    pub media_dir: PathBuf,
    /// Destination for `season-NN/episode-NN.<ext>` subtitles
    pub subtitles_dir: PathBuf,
    /// Accepted video extensions, compared exactly against the last extension
    pub video_extensions: Vec<String>,
    /// Accepted subtitle extensions, compared exactly against the last extension
    pub subtitle_extensions: Vec<String>,
    /// Plan and report everything, but leave the destination untouched
    pub dry_run: bool,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
            subtitles_dir: PathBuf::from(DEFAULT_SUBTITLES_DIR),
            video_extensions: to_owned_list(DEFAULT_VIDEO_EXTENSIONS),
            subtitle_extensions: to_owned_list(DEFAULT_SUBTITLE_EXTENSIONS),
            dry_run: false,
        }
    }
}

impl OrganizerConfig {
    /// Returns true if `extension` (without dot) is an accepted video extension
    pub fn is_video_extension(&self, extension: &str) -> bool {
        self.video_extensions.iter().any(|e| e == extension)
    }

    /// Returns true if `extension` (without dot) is an accepted subtitle extension
    pub fn is_subtitle_extension(&self, extension: &str) -> bool {
        self.subtitle_extensions.iter().any(|e| e == extension)
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
