//! media_organizer - Sort raw TV episode files into a normalized library
//!
//! This library walks a source tree of `Season <N>` directories, copies every
//! video carrying an `S01E02` style marker (and its subtitle, if one is found)
//! into `season-NN/episode-NN.<ext>` destinations, and writes one JSON
//! document per season describing the copied episodes.

mod config;
mod episode_parser;
mod file_operations;
mod metadata;
mod scanner;

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

// Re-export error types
pub use file_operations::FileOperationError;
pub use metadata::MetadataError;
pub use scanner::ScanError;

pub use config::{
    DEFAULT_MEDIA_DIR, DEFAULT_SOURCE_DIR, DEFAULT_SUBTITLE_EXTENSIONS, DEFAULT_SUBTITLES_DIR,
    DEFAULT_VIDEO_EXTENSIONS, OrganizerConfig,
};
pub use episode_parser::{EpisodeNumber, parse_episode_info};
pub use file_operations::{
    CopyKind, PlannedCopy, episode_file_name, execute_copy, plan_subtitle_copy, plan_video_copy,
    season_dir_name,
};
pub use metadata::{
    EpisodeRecord, SeasonMetadata, episode_id, read_season_metadata, season_metadata_path,
    write_season_metadata,
};
pub use scanner::{
    MediaFile, SeasonDirectory, SubtitleFile, find_subtitle, scan_media_files,
    scan_season_directories,
};

/// Progress event emitted while organizing
///
/// These events allow library users to report what the run is doing, or to
/// stay silent.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { source_dir: PathBuf, dry_run: bool },

    /// Entered a season directory
    SeasonStarted { season: u32, path: PathBuf },

    /// Copying (or, in a dry run, planning to copy) a video
    CopyingVideo { source: PathBuf, destination: PathBuf },

    /// Copying (or, in a dry run, planning to copy) a subtitle
    CopyingSubtitle { source: PathBuf, destination: PathBuf },

    /// A video without a usable season/episode marker was left alone
    SkippedFile { path: PathBuf },

    /// A season document was written (or, in a dry run, rendered)
    MetadataWritten {
        season: u32,
        path: PathBuf,
        episode_count: usize,
    },

    /// Run complete
    Complete { season_count: usize },
}

/// Per-season outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSummary {
    pub season: u32,
    /// Number of records in the season's document
    pub episode_count: usize,
    /// Path of the season's document
    pub metadata_path: PathBuf,
}

/// Outcome of a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeSummary {
    /// Seasons in ascending order
    pub seasons: Vec<SeasonSummary>,
    pub videos_copied: usize,
    pub subtitles_copied: usize,
    /// Total bytes copied (zero in a dry run)
    pub bytes_copied: u64,
    /// Videos skipped for lack of a usable season/episode marker
    pub skipped: Vec<PathBuf>,
}

/// Top-level error type for organize runs
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Error while scanning the source tree
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Error while copying files
    #[error("File operation error: {0}")]
    FileOperation(#[from] FileOperationError),

    /// Error while writing season metadata
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

/// Organizes the source tree into the destination layout
///
/// For every `Season <N>` directory under `config.source_dir` (in name order):
///
/// 1. `<media_dir>/season-NN` is created, even if no video ends up in it.
/// 2. Every video whose name parses to a non-zero season and episode is
///    copied to `<media_dir>/season-NN/episode-EE.<ext>`. Videos that do not
///    parse are skipped.
/// 3. If a `Subs` subfolder holds a folder named after the video's stem, its
///    first subtitle is copied to `<subtitles_dir>/season-SS/episode-EE.<ext>`
///    (numbers taken from the video's name).
/// 4. One [`EpisodeRecord`] per copied video is added to the season.
///
/// Afterwards each season's records are sorted by episode and written to
/// `<media_dir>/season_<N>.json`. Season directories resolving to the same
/// number share one document.
///
/// Existing destination files are overwritten. The first error aborts the
/// run; anything already copied stays in place.
///
/// With `config.dry_run` set nothing is created, copied or written, but the
/// same progress events are emitted and the summary lists what would happen.
///
/// # Examples
///
/// ```no_run
/// use media_organizer::{organize_media, OrganizerConfig, ProgressEvent};
///
/// let summary = organize_media(&OrganizerConfig::default(), |event| {
///     if let ProgressEvent::CopyingVideo { source, destination } = event {
///         println!("{} -> {}", source.display(), destination.display());
///     }
/// })
/// .unwrap();
///
/// println!("{} video(s) copied", summary.videos_copied);
/// ```
pub fn organize_media<F>(
    config: &OrganizerConfig,
    mut progress_callback: F,
) -> Result<OrganizeSummary, OrganizeError>
where
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::Started {
        source_dir: config.source_dir.clone(),
        dry_run: config.dry_run,
    });

    if !config.dry_run {
        file_operations::ensure_dir(&config.media_dir)?;
        file_operations::ensure_dir(&config.subtitles_dir)?;
    }

    let mut summary = OrganizeSummary::default();
    let mut seasons: BTreeMap<u32, SeasonMetadata> = BTreeMap::new();

    for season_dir in scan_season_directories(&config.source_dir)? {
        progress_callback(ProgressEvent::SeasonStarted {
            season: season_dir.season,
            path: season_dir.path.clone(),
        });
        info!(season = season_dir.season, "processing season");

        if !config.dry_run {
            file_operations::ensure_dir(
                &config.media_dir.join(season_dir_name(season_dir.season)),
            )?;
        }

        let metadata = seasons
            .entry(season_dir.season)
            .or_insert_with(|| SeasonMetadata::new(season_dir.season));

        for video in scan_media_files(&season_dir, config)? {
            let number = match video.episode {
                Some(number) if number.season > 0 && number.episode > 0 => number,
                _ => {
                    debug!(path = %video.path.display(), "no usable episode marker");
                    progress_callback(ProgressEvent::SkippedFile {
                        path: video.path.clone(),
                    });
                    summary.skipped.push(video.path);
                    continue;
                }
            };

            let video_copy = plan_video_copy(&config.media_dir, season_dir.season, &video, number);
            progress_callback(copy_event(&video_copy));
            summary.bytes_copied += run_copy(&video_copy, config.dry_run)?;
            summary.videos_copied += 1;

            let subtitle = find_subtitle(&season_dir.path, &video, config)?;
            if let Some(subtitle) = &subtitle {
                let subtitle_copy = plan_subtitle_copy(&config.subtitles_dir, subtitle, number);
                progress_callback(copy_event(&subtitle_copy));
                summary.bytes_copied += run_copy(&subtitle_copy, config.dry_run)?;
                summary.subtitles_copied += 1;
            }

            metadata.push(EpisodeRecord::new(number, subtitle.is_some()));
        }
    }

    for metadata in seasons.values_mut() {
        let path = if config.dry_run {
            metadata.sort();
            metadata.to_json()?;
            season_metadata_path(&config.media_dir, metadata.season)
        } else {
            write_season_metadata(&config.media_dir, metadata)?
        };

        progress_callback(ProgressEvent::MetadataWritten {
            season: metadata.season,
            path: path.clone(),
            episode_count: metadata.len(),
        });

        summary.seasons.push(SeasonSummary {
            season: metadata.season,
            episode_count: metadata.len(),
            metadata_path: path,
        });
    }

    progress_callback(ProgressEvent::Complete {
        season_count: summary.seasons.len(),
    });

    Ok(summary)
}

/// Progress event announcing a planned copy
fn copy_event(operation: &PlannedCopy) -> ProgressEvent {
    let source = operation.source.clone();
    let destination = operation.destination.clone();

    match operation.kind {
        CopyKind::Video => ProgressEvent::CopyingVideo {
            source,
            destination,
        },
        CopyKind::Subtitle => ProgressEvent::CopyingSubtitle {
            source,
            destination,
        },
    }
}

/// Executes a planned copy unless this is a dry run
fn run_copy(operation: &PlannedCopy, dry_run: bool) -> Result<u64, FileOperationError> {
    if dry_run {
        return Ok(0);
    }
    execute_copy(operation)
}
