//! Pipeline configuration
//!
//! Read from `pipeline.yaml` in the working directory when present; every
//! field has a default, so a partial file only overrides what it names.

use crate::error::PipelineError;
use crate::store::DataFiles;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "pipeline.yaml";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Podcast name used in the model prompts
    pub show_name: String,
    pub channel_url: String,
    pub data_dir: PathBuf,
    pub model: String,
    pub api_base_url: String,
    pub analysis_max_tokens: u32,
    pub enrichment_max_tokens: u32,
    pub yt_dlp_path: PathBuf,
    pub batch_size: usize,
    pub max_transcript_words: usize,
    pub delays: Delays,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            show_name: "How I AI".to_string(),
            channel_url: "https://www.youtube.com/@howiaipodcast/videos".to_string(),
            data_dir: PathBuf::from("data"),
            model: "claude-sonnet-4-20250514".to_string(),
            api_base_url: "https://api.anthropic.com".to_string(),
            analysis_max_tokens: 2000,
            enrichment_max_tokens: 4000,
            yt_dlp_path: PathBuf::from("yt-dlp"),
            batch_size: 50,
            max_transcript_words: 12_000,
            delays: Delays::default(),
        }
    }
}

/// Fixed pauses between network calls, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delays {
    pub collect_secs: f64,
    pub recover_secs: f64,
    pub analyze_secs: f64,
    pub enrich_secs: f64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            collect_secs: 2.0,
            recover_secs: 3.0,
            analyze_secs: 1.0,
            enrich_secs: 1.0,
        }
    }
}

impl Delays {
    pub fn collect(&self) -> Duration {
        seconds(self.collect_secs)
    }

    pub fn recover(&self) -> Duration {
        seconds(self.recover_secs)
    }

    pub fn analyze(&self) -> Duration {
        seconds(self.analyze_secs)
    }

    pub fn enrich(&self) -> Duration {
        seconds(self.enrich_secs)
    }
}

fn seconds(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

impl PipelineConfig {
    /// Load `pipeline.yaml` from `project_dir`, falling back to defaults.
    /// A relative `data_dir` is resolved against `project_dir`.
    pub fn load(project_dir: &Path) -> Result<Self, PipelineError> {
        let path = project_dir.join(CONFIG_FILE);

        let mut config: PipelineConfig = match std::fs::read_to_string(&path) {
            Ok(content) => {
                log::info!("Loaded configuration from {}", path.display());
                serde_yaml::from_str(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(PipelineError::Io(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        if config.data_dir.is_relative() {
            config.data_dir = project_dir.join(&config.data_dir);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::Config("batch_size must be at least 1".into()));
        }
        if self.max_transcript_words == 0 {
            return Err(PipelineError::Config(
                "max_transcript_words must be at least 1".into(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(PipelineError::Config("model must not be empty".into()));
        }
        Ok(())
    }

    pub fn data_files(&self) -> DataFiles {
        DataFiles::in_dir(&self.data_dir)
    }
}

/// API credential for the completion service: the process environment
/// first, then a `.env` file in the project directory.
pub fn api_key(project_dir: &Path) -> Result<String, PipelineError> {
    resolve_api_key(std::env::var(API_KEY_VAR).ok(), project_dir)
}

fn resolve_api_key(from_env: Option<String>, project_dir: &Path) -> Result<String, PipelineError> {
    from_env
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| load_env_value(project_dir, API_KEY_VAR))
        .ok_or_else(|| PipelineError::MissingCredential(API_KEY_VAR.to_string()))
}

/// Load a value from the .env file by key name
pub fn load_env_value(project_dir: &Path, key: &str) -> Option<String> {
    let env_path = project_dir.join(".env");
    let prefix = format!("{}=", key);
    let content = std::fs::read_to_string(&env_path).ok()?;

    for line in content.lines() {
        let trimmed = line.trim();
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some(value) = trimmed.strip_prefix(&prefix) {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
