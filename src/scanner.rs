//! Source tree scanning
//!
//! Finds `Season <N>` directories under the source root, the video files
//! directly inside each of them, and the subtitle belonging to a video in
//! the season's `Subs` folder.

use crate::config::OrganizerConfig;
use crate::episode_parser::{EpisodeNumber, parse_episode_info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Prefix identifying a season directory
const SEASON_DIR_PREFIX: &str = "Season ";

/// Name of the per-season folder holding subtitle subfolders
const SUBS_DIR_NAME: &str = "Subs";

/// Errors that can occur while scanning the source tree
#[derive(Debug, Error)]
pub enum ScanError {
    /// Failed to read directory
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to read directory entry
    #[error("Failed to read directory entry in {path}: {source}")]
    ReadEntryFailed { path: PathBuf, source: io::Error },

    /// A `Season ...` directory whose name carries no season number
    #[error("Cannot determine season number from directory name: {0}")]
    InvalidSeasonNumber(PathBuf),
}

/// A source directory holding one season's raw files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonDirectory {
    /// Season number taken from the directory name
    pub season: u32,
    /// Path to the directory
    pub path: PathBuf,
}

/// A video file found directly inside a season directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Path to the video file
    pub path: PathBuf,
    /// Season and episode parsed from the filename, if it carries a marker
    pub episode: Option<EpisodeNumber>,
}

impl MediaFile {
    /// The filename without its last extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The last extension without dot
    pub fn extension(&self) -> String {
        extension_of(&self.path).unwrap_or_default()
    }
}

/// A subtitle file matched to a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleFile {
    /// Path to the subtitle file
    pub path: PathBuf,
}

impl SubtitleFile {
    /// The last extension without dot
    pub fn extension(&self) -> String {
        extension_of(&self.path).unwrap_or_default()
    }
}

/// Lists the season directories directly below `source_dir`
///
/// A season directory is any subdirectory whose name starts with `"Season "`.
/// The season number is the second whitespace-separated word of the name.
/// Results are ordered by directory name.
///
/// # Errors
///
/// Fails if `source_dir` cannot be read, or if a `Season ...` directory does
/// not carry an integer as its second word.
pub fn scan_season_directories(source_dir: &Path) -> Result<Vec<SeasonDirectory>, ScanError> {
    let mut seasons = Vec::new();

    for path in sorted_entries(source_dir)? {
        if !path.is_dir() {
            continue;
        }

        let name = file_name_of(&path);
        if !name.starts_with(SEASON_DIR_PREFIX) {
            trace!(path = %path.display(), "ignoring non-season directory");
            continue;
        }

        let season = parse_season_number(&name)
            .ok_or_else(|| ScanError::InvalidSeasonNumber(path.clone()))?;

        debug!(season, path = %path.display(), "found season directory");
        seasons.push(SeasonDirectory { season, path });
    }

    Ok(seasons)
}

/// Lists the video files directly inside a season directory
///
/// Only regular files with an accepted video extension are returned; nested
/// directories are not descended into. Each file's name is run through the
/// episode parser. Results are ordered by filename.
pub fn scan_media_files(
    season_dir: &SeasonDirectory,
    config: &OrganizerConfig,
) -> Result<Vec<MediaFile>, ScanError> {
    let mut media_files = Vec::new();

    for path in sorted_entries(&season_dir.path)? {
        if !path.is_file() {
            continue;
        }

        let is_video = extension_of(&path)
            .map(|ext| config.is_video_extension(&ext))
            .unwrap_or(false);
        if !is_video {
            continue;
        }

        let episode = parse_episode_info(&file_name_of(&path));
        media_files.push(MediaFile { path, episode });
    }

    Ok(media_files)
}

/// Looks up the subtitle for a video in the season's `Subs` folder
///
/// Subfolders of `<season_dir>/Subs` are checked in name order; the first one
/// whose name contains the video's stem and holds a file with an accepted
/// subtitle extension provides the subtitle (first such file by name).
///
/// Returns `None` if there is no `Subs` folder or nothing matches.
pub fn find_subtitle(
    season_dir: &Path,
    video: &MediaFile,
    config: &OrganizerConfig,
) -> Result<Option<SubtitleFile>, ScanError> {
    let subs_dir = season_dir.join(SUBS_DIR_NAME);
    if !subs_dir.is_dir() {
        return Ok(None);
    }

    let stem = video.stem();

    for folder in sorted_entries(&subs_dir)? {
        if !folder.is_dir() || !file_name_of(&folder).contains(&stem) {
            continue;
        }

        for candidate in sorted_entries(&folder)? {
            let is_subtitle = candidate.is_file()
                && extension_of(&candidate)
                    .map(|ext| config.is_subtitle_extension(&ext))
                    .unwrap_or(false);

            if is_subtitle {
                debug!(video = %video.path.display(), subtitle = %candidate.display(), "matched subtitle");
                return Ok(Some(SubtitleFile { path: candidate }));
            }
        }
    }

    Ok(None)
}

/// Parses the season number out of a `Season <N>` directory name
fn parse_season_number(name: &str) -> Option<u32> {
    name.split_whitespace().nth(1)?.parse().ok()
}

/// Reads a directory and returns its entries ordered by name
fn sorted_entries(dir_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let entries = fs::read_dir(dir_path).map_err(|e| ScanError::ReadDirectoryFailed {
        path: dir_path.to_path_buf(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ScanError::ReadEntryFailed {
            path: dir_path.to_path_buf(),
            source: e,
        })?;
        paths.push(entry.path());
    }

    paths.sort();
    Ok(paths)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap();
    }

    #[test]
    fn test_parse_season_number() {
        assert_eq!(parse_season_number("Season 1"), Some(1));
        assert_eq!(parse_season_number("Season 07"), Some(7));
        assert_eq!(parse_season_number("Season 3 (2007)"), Some(3));
        assert_eq!(parse_season_number("Season X"), None);
        assert_eq!(parse_season_number("Season "), None);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let result = scan_season_directories(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(matches!(result, Err(ScanError::ReadDirectoryFailed { .. })));
    }

    #[test]
    fn test_scan_season_directories_filters_and_orders() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("Season 2")).unwrap();
        fs::create_dir(temp.path().join("Season 1")).unwrap();
        fs::create_dir(temp.path().join("Specials")).unwrap();
        fs::create_dir(temp.path().join("season 3")).unwrap();
        touch(&temp.path().join("Season 4"));

        let seasons = scan_season_directories(temp.path()).unwrap();
        let numbers: Vec<u32> = seasons.iter().map(|s| s.season).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(seasons[0].path, temp.path().join("Season 1"));
    }

    #[test]
    fn test_scan_season_directories_invalid_number() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("Season One")).unwrap();

        let result = scan_season_directories(temp.path());
        assert!(matches!(result, Err(ScanError::InvalidSeasonNumber(_))));
    }

    #[test]
    fn test_scan_media_files_only_videos() {
        let temp = TempDir::new().unwrap();
        let season_path = temp.path().join("Season 1");
        touch(&season_path.join("Office.S01E02.mkv"));
        touch(&season_path.join("Office.S01E01.mp4"));
        touch(&season_path.join("random.avi"));
        touch(&season_path.join("notes.txt"));
        touch(&season_path.join("LOUD.S01E03.MKV"));
        touch(&season_path.join("Extras").join("Office.S01E09.mkv"));

        let season = SeasonDirectory { season: 1, path: season_path.clone() };
        let files = scan_media_files(&season, &OrganizerConfig::default()).unwrap();

        let names: Vec<String> = files.iter().map(|f| file_name_of(&f.path)).collect();
        assert_eq!(names, vec!["Office.S01E01.mp4", "Office.S01E02.mkv", "random.avi"]);
        assert_eq!(files[1].episode, Some(EpisodeNumber { season: 1, episode: 2 }));
        assert_eq!(files[2].episode, None);
        assert_eq!(files[1].stem(), "Office.S01E02");
        assert_eq!(files[1].extension(), "mkv");
    }

    #[test]
    fn test_find_subtitle_without_subs_dir() {
        let temp = TempDir::new().unwrap();
        let video = MediaFile {
            path: temp.path().join("Office.S01E02.mkv"),
            episode: Some(EpisodeNumber { season: 1, episode: 2 }),
        };

        let found = find_subtitle(temp.path(), &video, &OrganizerConfig::default()).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_subtitle_matches_folder_by_stem() {
        let temp = TempDir::new().unwrap();
        let subs = temp.path().join("Subs");
        touch(&subs.join("Office.S01E01").join("English.srt"));
        touch(&subs.join("[eng] Office.S01E02 subs").join("2_English.srt"));
        touch(&subs.join("[eng] Office.S01E02 subs").join("1_English.vtt"));

        let video = MediaFile {
            path: temp.path().join("Office.S01E02.mkv"),
            episode: Some(EpisodeNumber { season: 1, episode: 2 }),
        };

        let found = find_subtitle(temp.path(), &video, &OrganizerConfig::default()).unwrap();
        assert_eq!(
            found,
            Some(SubtitleFile {
                path: subs.join("[eng] Office.S01E02 subs").join("1_English.vtt")
            })
        );
    }

    #[test]
    fn test_find_subtitle_skips_folders_without_subtitles() {
        let temp = TempDir::new().unwrap();
        let subs = temp.path().join("Subs");
        touch(&subs.join("a Office.S01E02").join("readme.txt"));
        touch(&subs.join("b Office.S01E02").join("English.srt"));

        let video = MediaFile {
            path: temp.path().join("Office.S01E02.mkv"),
            episode: Some(EpisodeNumber { season: 1, episode: 2 }),
        };

        let found = find_subtitle(temp.path(), &video, &OrganizerConfig::default()).unwrap();
        assert_eq!(
            found.map(|s| s.path),
            Some(subs.join("b Office.S01E02").join("English.srt"))
        );
    }

    #[test]
    fn test_find_subtitle_no_matching_folder() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("Subs").join("Office.S01E03").join("English.srt"));

        let video = MediaFile {
            path: temp.path().join("Office.S01E02.mkv"),
            episode: Some(EpisodeNumber { season: 1, episode: 2 }),
        };

        let found = find_subtitle(temp.path(), &video, &OrganizerConfig::default()).unwrap();
        assert_eq!(found, None);
    }
}
