//! In-memory collaborators and fixtures for stage tests

use crate::llm::{CompletionClient, LlmError};
use crate::store::{
    Analysis, Audience, Category, Difficulty, Episode, EpisodeUseCase, TranscriptSegment,
    UseCase,
};
use crate::youtube::{
    RawVideoEntry, SourceError, SubtitleSource, TranscriptSource, VideoSource,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub fn episode(id: &str, title: &str, duration_seconds: u64) -> Episode {
    Episode {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        publish_date: Some("20240105".to_string()),
        duration_seconds,
        thumbnail_url: None,
        url: Episode::watch_url(id),
        transcript: None,
        transcript_segments: None,
        analysis: None,
    }
}

pub fn segments(texts: &[&str]) -> Vec<TranscriptSegment> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| TranscriptSegment {
            text: t.to_string(),
            start_time_seconds: i as f64 * 2.5,
        })
        .collect()
}

pub fn raw_entry(id: &str, title: &str, duration: f64) -> RawVideoEntry {
    RawVideoEntry {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        description: Some(String::new()),
        duration: Some(duration),
        thumbnail: Some(format!("https://i.ytimg.com/vi/{}/hq.jpg", id)),
        upload_date: Some("20240105".to_string()),
    }
}

pub fn episode_use_case(title: &str) -> EpisodeUseCase {
    EpisodeUseCase {
        title: title.to_string(),
        description: format!("{} in practice", title),
        tools: vec!["Claude".to_string()],
        category: Category::Automation,
        audience: Audience::Everyone,
        difficulty: Difficulty::Intermediate,
    }
}

pub fn analysis_with(titles: &[&str]) -> Analysis {
    Analysis {
        guest_name: Some("Jane Doe".to_string()),
        guest_role: None,
        summary: "Summary".to_string(),
        key_takeaways: vec![],
        use_cases: titles.iter().map(|t| episode_use_case(t)).collect(),
        tools_mentioned: vec!["Claude".to_string()],
        notable_quotes: vec![],
    }
}

pub fn use_case(episode_id: &str, title: &str) -> UseCase {
    let description = format!("{} in practice", title);
    UseCase {
        id: UseCase::derive_id(episode_id, title, &description, 0),
        title: title.to_string(),
        description,
        tools: vec!["Claude".to_string()],
        category: Category::Automation,
        audience: Audience::Everyone,
        difficulty: Difficulty::Intermediate,
        episode_id: episode_id.to_string(),
        episode_title: format!("Episode {}", episode_id),
        guest_name: None,
        publish_date: None,
        intents: None,
        is_pick: None,
        pick_reason: None,
    }
}

// ============================================================================
// Sources
// ============================================================================

pub struct FakeVideos {
    pub entries: Vec<Option<RawVideoEntry>>,
    pub fail: bool,
}

impl FakeVideos {
    pub fn new(entries: Vec<Option<RawVideoEntry>>) -> Self {
        Self {
            entries,
            fail: false,
        }
    }
}

#[async_trait]
impl VideoSource for FakeVideos {
    async fn list_videos(&self, _channel: &str) -> Result<Vec<Option<RawVideoEntry>>, SourceError> {
        if self.fail {
            return Err(SourceError::Failed {
                program: "fake".into(),
                stderr: "channel unavailable".into(),
            });
        }
        Ok(self.entries.clone())
    }
}

/// Serves tracks keyed by (video id, language); records every fetch.
#[derive(Default)]
pub struct FakeTranscripts {
    tracks: HashMap<(String, String), Vec<TranscriptSegment>>,
    languages: HashMap<String, Vec<String>>,
    pub fetches: Mutex<Vec<(String, String)>>,
}

impl FakeTranscripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, video_id: &str, language: &str, texts: &[&str]) -> Self {
        self.tracks
            .insert((video_id.to_string(), language.to_string()), segments(texts));
        self.languages
            .entry(video_id.to_string())
            .or_default()
            .push(language.to_string());
        self
    }

    /// Advertise a language that fails when fetched
    pub fn with_broken_language(mut self, video_id: &str, language: &str) -> Self {
        self.languages
            .entry(video_id.to_string())
            .or_default()
            .push(language.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl TranscriptSource for FakeTranscripts {
    async fn fetch(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, SourceError> {
        self.fetches
            .lock()
            .unwrap()
            .push((video_id.to_string(), language.to_string()));

        self.tracks
            .get(&(video_id.to_string(), language.to_string()))
            .cloned()
            .ok_or_else(|| SourceError::Unavailable {
                what: format!("captions ({})", language),
                video_id: video_id.to_string(),
            })
    }

    async fn list_languages(&self, video_id: &str) -> Result<Vec<String>, SourceError> {
        Ok(self.languages.get(video_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeSubtitles {
    files: HashMap<String, String>,
    pub downloads: Mutex<Vec<String>>,
}

impl FakeSubtitles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, video_id: &str, content: &str) -> Self {
        self.files.insert(video_id.to_string(), content.to_string());
        self
    }
}

#[async_trait]
impl SubtitleSource for FakeSubtitles {
    async fn download_subtitles(&self, video_id: &str) -> Result<String, SourceError> {
        self.downloads.lock().unwrap().push(video_id.to_string());
        self.files
            .get(video_id)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable {
                what: "vtt subtitles".into(),
                video_id: video_id.to_string(),
            })
    }
}

// ============================================================================
// Completion
// ============================================================================

/// Replies with queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: LlmError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn user_message(&self, n: usize) -> String {
        self.requests.lock().unwrap()[n].1.clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Unexpected("no scripted reply".into())))
    }
}
