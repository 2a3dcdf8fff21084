//! Per-season episode metadata
//!
//! Every copied episode gets an [`EpisodeRecord`]. The records of one season
//! are written, sorted by episode number, as a pretty-printed JSON array to
//! `<media_dir>/season_<N>.json`, the format read by the playback API.

use crate::episode_parser::{EpisodeNumber, parse_episode_info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Show prefix used in episode ids
const SHOW_ID_PREFIX: &str = "Show";

/// Errors that can occur while writing or reading season documents
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Failed to serialize a season document
    #[error("Failed to serialize metadata for season {season}: {source}")]
    SerializationFailed {
        season: u32,
        source: serde_json::Error,
    },

    /// Failed to write a season document
    #[error("Failed to write metadata file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a season document
    #[error("Failed to read metadata file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A season document is not a valid episode list
    #[error("Failed to parse metadata file {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Metadata describing one episode and where the API serves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    /// Episode id, e.g. `Show_S01E02`
    pub id: String,
    /// Synthesized title, e.g. `Episode 2`
    pub title: String,
    /// `/api/episode/<id>/video`
    pub video_url: String,
    /// `/api/episode/<id>/subtitle`, or null without a subtitle
    pub subtitle_url: Option<String>,
    /// Episode number used for ordering; not part of the document
    #[serde(skip)]
    pub episode: u32,
}

impl EpisodeRecord {
    /// Builds the record for a parsed episode
    pub fn new(number: EpisodeNumber, has_subtitle: bool) -> Self {
        let id = episode_id(number);
        let video_url = format!("/api/episode/{id}/video");
        let subtitle_url = has_subtitle.then(|| format!("/api/episode/{id}/subtitle"));

        Self {
            title: episode_title(number),
            id,
            video_url,
            subtitle_url,
            episode: number.episode,
        }
    }
}

/// Formats an episode id like `Show_S01E02`
pub fn episode_id(number: EpisodeNumber) -> String {
    format!(
        "{SHOW_ID_PREFIX}_S{:02}E{:02}",
        number.season, number.episode
    )
}

/// Synthesizes an episode title; no titles are looked up
pub fn episode_title(number: EpisodeNumber) -> String {
    format!("Episode {}", number.episode)
}

/// The records collected for one season
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonMetadata {
    /// Season number the document is named after
    pub season: u32,
    records: Vec<EpisodeRecord>,
}

impl SeasonMetadata {
    pub fn new(season: u32) -> Self {
        Self {
            season,
            records: Vec::new(),
        }
    }

    /// Appends a record; duplicates are kept
    pub fn push(&mut self, record: EpisodeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Orders records by episode number, keeping insertion order for ties
    pub fn sort(&mut self) {
        self.records.sort_by_key(|r| r.episode);
    }

    /// Renders the records as a 2-space indented JSON array
    pub fn to_json(&self) -> Result<String, MetadataError> {
        serde_json::to_string_pretty(&self.records).map_err(|e| {
            MetadataError::SerializationFailed {
                season: self.season,
                source: e,
            }
        })
    }
}

/// Path of a season's document: `<media_dir>/season_<N>.json` (number not padded)
pub fn season_metadata_path(media_dir: &Path, season: u32) -> PathBuf {
    media_dir.join(format!("season_{season}.json"))
}

/// Sorts a season's records and writes them to its document
///
/// An existing document is overwritten. Returns the path written.
pub fn write_season_metadata(
    media_dir: &Path,
    metadata: &mut SeasonMetadata,
) -> Result<PathBuf, MetadataError> {
    metadata.sort();
    let content = metadata.to_json()?;
    let path = season_metadata_path(media_dir, metadata.season);

    fs::write(&path, content).map_err(|e| MetadataError::WriteFailed {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}

/// Loads the records from a season document
///
/// The episode number of each record is recovered from its id.
pub fn read_season_metadata(path: &Path) -> Result<Vec<EpisodeRecord>, MetadataError> {
    let content = fs::read_to_string(path).map_err(|e| MetadataError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut records: Vec<EpisodeRecord> =
        serde_json::from_str(&content).map_err(|e| MetadataError::DeserializationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    for record in &mut records {
        if let Some(number) = parse_episode_info(&record.id) {
            record.episode = number.episode;
        }
    }

    Ok(records)
}
