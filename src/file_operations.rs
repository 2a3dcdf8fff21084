use crate::episode_parser::EpisodeNumber;
use crate::scanner::{MediaFile, SubtitleFile};
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during file operations
#[derive(Debug, Error)]
pub enum FileOperationError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    #[error("Failed to copy {from} to {to}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Failed to preserve timestamps on {path}: {source}")]
    PreserveTimesFailed { path: PathBuf, source: io::Error },
}

/// What kind of file a planned copy moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    Video,
    Subtitle,
}

/// Represents a planned copy into the destination layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub kind: CopyKind,
    /// Source file path
    pub source: PathBuf,
    /// Destination file path, overwritten if it exists
    pub destination: PathBuf,
    /// Episode the file was parsed as
    pub episode: EpisodeNumber,
}

/// Name of a destination season directory, e.g. `season-01`
pub fn season_dir_name(season: u32) -> String {
    format!("season-{season:02}")
}

/// Name of a destination episode file, e.g. `episode-02.mkv`
///
/// `extension` is given without the dot; an empty extension yields a name
/// without one.
pub fn episode_file_name(episode: u32, extension: &str) -> String {
    if extension.is_empty() {
        format!("episode-{episode:02}")
    } else {
        format!("episode-{episode:02}.{extension}")
    }
}

/// Plans the copy of a video into `<media_dir>/season-NN/episode-NN.<ext>`
///
/// The season directory is named after `season_dir_season`, the number of the
/// source season directory the video was found in. The file name uses the
/// episode parsed from the video's own name.
pub fn plan_video_copy(
    media_dir: &Path,
    season_dir_season: u32,
    video: &MediaFile,
    episode: EpisodeNumber,
) -> PlannedCopy {
    let destination = media_dir
        .join(season_dir_name(season_dir_season))
        .join(episode_file_name(episode.episode, &video.extension()));

    PlannedCopy {
        kind: CopyKind::Video,
        source: video.path.clone(),
        destination,
        episode,
    }
}

/// Plans the copy of a subtitle into `<subtitles_dir>/season-NN/episode-NN.<ext>`
///
/// Both numbers come from the episode parsed from the video's name.
pub fn plan_subtitle_copy(
    subtitles_dir: &Path,
    subtitle: &SubtitleFile,
    episode: EpisodeNumber,
) -> PlannedCopy {
    let destination = subtitles_dir
        .join(season_dir_name(episode.season))
        .join(episode_file_name(episode.episode, &subtitle.extension()));

    PlannedCopy {
        kind: CopyKind::Subtitle,
        source: subtitle.path.clone(),
        destination,
        episode,
    }
}

/// Creates a directory and all missing parents
pub fn ensure_dir(path: &Path) -> Result<(), FileOperationError> {
    fs::create_dir_all(path).map_err(|e| FileOperationError::CreateDirectoryFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Executes a planned copy
///
/// Creates the destination's parent directory if needed, overwrites an
/// existing destination file, and carries over permissions plus access and
/// modification times. Returns the number of bytes copied.
pub fn execute_copy(operation: &PlannedCopy) -> Result<u64, FileOperationError> {
    if let Some(parent) = operation.destination.parent() {
        ensure_dir(parent)?;
    }

    let bytes = copy_with_times(&operation.source, &operation.destination)?;
    debug!(
        kind = ?operation.kind,
        season = operation.episode.season,
        episode = operation.episode.episode,
        to = %operation.destination.display(),
        bytes,
        "copied"
    );

    Ok(bytes)
}

/// Copies file contents, then the source's timestamps and permissions
///
/// Timestamps go through the writable destination handle; the source's
/// permissions are applied last.
fn copy_with_times(from: &Path, to: &Path) -> Result<u64, FileOperationError> {
    let copy_failed = |e: io::Error| FileOperationError::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    };
    let times_failed = |e: io::Error| FileOperationError::PreserveTimesFailed {
        path: to.to_path_buf(),
        source: e,
    };

    let mut reader = File::open(from).map_err(copy_failed)?;
    let metadata = reader.metadata().map_err(copy_failed)?;
    let mut writer = File::create(to).map_err(copy_failed)?;
    let bytes = io::copy(&mut reader, &mut writer).map_err(copy_failed)?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    writer.set_times(times).map_err(times_failed)?;
    drop(writer);

    fs::set_permissions(to, metadata.permissions()).map_err(copy_failed)?;

    Ok(bytes)
}
