use clap::{ArgAction, Parser};
use humansize::{DECIMAL, format_size};
use media_organizer::{
    DEFAULT_MEDIA_DIR, DEFAULT_SOURCE_DIR, DEFAULT_SUBTITLE_EXTENSIONS, DEFAULT_SUBTITLES_DIR,
    DEFAULT_VIDEO_EXTENSIONS, OrganizeSummary, OrganizerConfig, ProgressEvent, organize_media,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Sort raw TV episode files into season folders and write per-season episode metadata
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory containing the "Season <N>" directories
    #[arg(long, env = "MEDIA_SOURCE_DIR", default_value = DEFAULT_SOURCE_DIR)]
    source: PathBuf,

    /// Destination for videos and season_<N>.json documents
    #[arg(long, env = "MEDIA_DIR", default_value = DEFAULT_MEDIA_DIR)]
    media_dir: PathBuf,

    /// Destination for subtitles
    #[arg(long, env = "SUBTITLES_DIR", default_value = DEFAULT_SUBTITLES_DIR)]
    subtitles_dir: PathBuf,

    /// Video file extensions to pick up (comma separated, without dot)
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_VIDEO_EXTENSIONS.iter().copied())]
    video_ext: Vec<String>,

    /// Subtitle file extensions to pick up (comma separated, without dot)
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_SUBTITLE_EXTENSIONS.iter().copied())]
    subtitle_ext: Vec<String>,

    /// Show what would be copied and written without touching the destination
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> OrganizerConfig {
        OrganizerConfig {
            source_dir: self.source,
            media_dir: self.media_dir,
            subtitles_dir: self.subtitles_dir,
            video_extensions: self.video_ext,
            subtitle_extensions: self.subtitle_ext,
            dry_run: self.dry_run,
        }
    }
}

/// Installs the log subscriber; RUST_LOG takes precedence over -v
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("media_organizer={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::Started { source_dir, dry_run } => {
            if dry_run {
                println!("Dry run: nothing will be copied or written.");
            }
            println!("Organizing media from {}", source_dir.display());
        }
        ProgressEvent::SeasonStarted { season, .. } => {
            println!("Processing Season {}", season);
        }
        ProgressEvent::CopyingVideo {
            source,
            destination,
        } => {
            let name = source.file_name().unwrap_or(source.as_os_str());
            println!(
                "  Copying {} -> {}",
                name.to_string_lossy(),
                destination.display()
            );
        }
        ProgressEvent::CopyingSubtitle {
            source,
            destination,
        } => {
            println!(
                "  Copying subtitle {} -> {}",
                source.display(),
                destination.display()
            );
        }
        ProgressEvent::SkippedFile { path } => {
            println!("  Skipping {} (no season/episode marker)", path.display());
        }
        ProgressEvent::MetadataWritten {
            path,
            episode_count,
            ..
        } => {
            println!(
                "Creating {} with {} episodes",
                path.display(),
                episode_count
            );
        }
        ProgressEvent::Complete { .. } => {
            println!("Media organization complete!");
        }
    }
}

fn print_summary(summary: &OrganizeSummary, dry_run: bool) {
    println!("\n=== Summary ===\n");

    for season in &summary.seasons {
        println!("  Season {}: {} episode(s)", season.season, season.episode_count);
    }

    println!(
        "\n  Videos: {}  Subtitles: {}  Skipped: {}",
        summary.videos_copied,
        summary.subtitles_copied,
        summary.skipped.len()
    );
    if !dry_run {
        println!("  Copied {}", format_size(summary.bytes_copied, DECIMAL));
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config();

    match organize_media(&config, handle_progress_event) {
        Ok(summary) => print_summary(&summary, config.dry_run),
        Err(e) => {
            eprintln!("\nError while organizing media: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_matches_default_config() {
        let cli = Cli::try_parse_from(["media_organizer"]).unwrap();
        assert_eq!(cli.into_config(), OrganizerConfig::default());
    }

    #[test]
    fn test_extension_lists_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "media_organizer",
            "--video-ext",
            "webm,mkv",
            "--subtitle-ext",
            "ass",
            "--dry-run",
        ])
        .unwrap();
        let config = cli.into_config();

        assert_eq!(config.video_extensions, vec!["webm", "mkv"]);
        assert_eq!(config.subtitle_extensions, vec!["ass"]);
        assert!(config.dry_run);
    }
}
