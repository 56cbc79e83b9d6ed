//! YouTube access: channel listing, timed transcripts and subtitle files.
//!
//! The pipeline only talks to the three source traits. `YtDlp` implements
//! all of them by shelling out to the `yt-dlp` binary.

pub mod subtitles;

use crate::store::{Episode, TranscriptSegment};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} failed: {stderr}")]
    Failed { program: String, stderr: String },

    #[error("Failed to parse {what}: {reason}")]
    Parse { what: String, reason: String },

    #[error("No {what} available for {video_id}")]
    Unavailable { what: String, video_id: String },

    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e.to_string())
    }
}

/// One entry of a channel listing as yt-dlp reports it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawVideoEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
}

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Every entry of the channel listing, in listing order. Entries the
    /// source could not resolve come back as `None`.
    async fn list_videos(&self, channel: &str) -> Result<Vec<Option<RawVideoEntry>>, SourceError>;
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, SourceError>;

    /// Language codes of the caption tracks the video offers
    async fn list_languages(&self, video_id: &str) -> Result<Vec<String>, SourceError>;
}

#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// Raw subtitle file content (VTT) for the video
    async fn download_subtitles(&self, video_id: &str) -> Result<String, SourceError>;
}

// ============================================================================
// yt-dlp adapter
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChannelListing {
    #[serde(default)]
    entries: Vec<Option<RawVideoEntry>>,
}

#[derive(Debug, Deserialize)]
struct TrackListing {
    #[serde(default)]
    subtitles: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    automatic_captions: BTreeMap<String, serde_json::Value>,
}

impl TrackListing {
    /// Uploaded tracks first, then auto-generated tracks in the video's
    /// own spoken language (`<code>-orig`); machine translations are skipped.
    fn languages(self) -> Vec<String> {
        let mut languages: Vec<String> = self
            .subtitles
            .into_keys()
            .filter(|code| code != "live_chat")
            .collect();

        for code in self.automatic_captions.into_keys() {
            if code.ends_with("-orig") && !languages.contains(&code) {
                languages.push(code);
            }
        }
        languages
    }
}

pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn program(&self) -> String {
        self.binary.display().to_string()
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, SourceError> {
        log::debug!("Running {} {}", self.program(), args.join(" "));

        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SourceError::Spawn {
                program: self.program(),
                reason: e.to_string(),
            })
    }

    fn failure(&self, output: &std::process::Output) -> SourceError {
        SourceError::Failed {
            program: self.program(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Download one subtitle track into `dir` and return the path of the
    /// first file with the requested extension.
    async fn download_track(
        &self,
        dir: &Path,
        video_id: &str,
        language: &str,
        format: &str,
    ) -> Result<PathBuf, SourceError> {
        let template = dir.join("%(id)s").display().to_string();
        let url = Episode::watch_url(video_id);

        let output = self
            .run(&[
                "--quiet",
                "--no-warnings",
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-langs",
                language,
                "--sub-format",
                format,
                "-o",
                &template,
                &url,
            ])
            .await?;

        if !output.status.success() {
            return Err(self.failure(&output));
        }

        find_with_extension(dir, format)?.ok_or_else(|| SourceError::Unavailable {
            what: format!("{} subtitles ({})", format, language),
            video_id: video_id.to_string(),
        })
    }
}

fn find_with_extension(dir: &Path, extension: &str) -> Result<Option<PathBuf>, SourceError> {
    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

#[async_trait]
impl VideoSource for YtDlp {
    async fn list_videos(&self, channel: &str) -> Result<Vec<Option<RawVideoEntry>>, SourceError> {
        let output = self
            .run(&[
                "-J",
                "--quiet",
                "--no-warnings",
                "--ignore-errors",
                "--skip-download",
                channel,
            ])
            .await?;

        // --ignore-errors exits non-zero when a single entry fails; the
        // listing on stdout is still usable
        if output.stdout.is_empty() {
            return Err(self.failure(&output));
        }
        if !output.status.success() {
            log::warn!(
                "{} reported errors while listing {}; continuing with partial listing",
                self.program(),
                channel
            );
        }

        let listing: ChannelListing =
            serde_json::from_slice(&output.stdout).map_err(|e| SourceError::Parse {
                what: "channel listing".into(),
                reason: e.to_string(),
            })?;

        Ok(listing.entries)
    }
}

#[async_trait]
impl TranscriptSource for YtDlp {
    async fn fetch(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, SourceError> {
        let scratch = TempDir::new()?;
        let path = self
            .download_track(scratch.path(), video_id, language, "json3")
            .await?;

        let content = tokio::fs::read_to_string(&path).await?;
        let segments = subtitles::parse_json3(&content).map_err(|e| SourceError::Parse {
            what: "json3 captions".into(),
            reason: e.to_string(),
        })?;

        if segments.is_empty() {
            return Err(SourceError::Unavailable {
                what: format!("caption text ({})", language),
                video_id: video_id.to_string(),
            });
        }
        Ok(segments)
    }

    async fn list_languages(&self, video_id: &str) -> Result<Vec<String>, SourceError> {
        let url = Episode::watch_url(video_id);
        let output = self
            .run(&["-J", "--quiet", "--no-warnings", "--skip-download", &url])
            .await?;

        if !output.status.success() {
            return Err(self.failure(&output));
        }

        let listing: TrackListing =
            serde_json::from_slice(&output.stdout).map_err(|e| SourceError::Parse {
                what: "track listing".into(),
                reason: e.to_string(),
            })?;

        Ok(listing.languages())
    }
}

#[async_trait]
impl SubtitleSource for YtDlp {
    async fn download_subtitles(&self, video_id: &str) -> Result<String, SourceError> {
        let scratch = TempDir::new()?;
        let path = self
            .download_track(scratch.path(), video_id, "en", "vtt")
            .await?;

        Ok(tokio::fs::read_to_string(&path).await?)
    }
}
