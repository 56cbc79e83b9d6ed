//! Per-episode structured extraction through the completion service

use super::decode::{decode_analysis, DecodeError};
use super::pacer::Pacer;
use super::prompts;
use super::resume::AnalysisCheckpoint;
use super::truncate_chars;
use crate::error::PipelineError;
use crate::llm::{strip_code_fence, CompletionClient, LlmError};
use crate::store::{Analysis, Episode, JsonDocument};
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

pub const TRUNCATION_MARKER: &str = " [TRUNCATED]";
pub const DESCRIPTION_EXCERPT_CHARS: usize = 500;
const RAW_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("API error: {0}")]
    Llm(#[from] LlmError),

    #[error("{source} (raw response: {excerpt}...)")]
    Decode {
        source: DecodeError,
        excerpt: String,
    },
}

/// Keep the first `max_words` whitespace-separated words, marking the cut.
/// Text within the limit is returned untouched.
pub fn truncate_words(text: &str, max_words: usize) -> Cow<'_, str> {
    let mut words = text.split_whitespace();
    let head: Vec<&str> = words.by_ref().take(max_words).collect();
    if words.next().is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(format!("{}{}", head.join(" "), TRUNCATION_MARKER))
}

/// The content block sent for one episode, or `None` when the episode has
/// neither transcript nor description.
pub fn build_content(episode: &Episode, max_words: usize) -> Option<String> {
    let mut content = format!("Episode Title: {}\n", episode.title);

    if let Some(transcript) = episode.transcript.as_deref().filter(|t| !t.trim().is_empty()) {
        content.push_str(&format!(
            "Episode Description: {}\n\n",
            truncate_chars(&episode.description, DESCRIPTION_EXCERPT_CHARS)
        ));
        content.push_str("FULL TRANSCRIPT:\n");
        content.push_str(&truncate_words(transcript, max_words));
        Some(content)
    } else if !episode.description.trim().is_empty() {
        content.push_str("EPISODE DESCRIPTION (no transcript available):\n");
        content.push_str(&episode.description);
        Some(content)
    } else {
        None
    }
}

pub struct Extractor<'a> {
    client: &'a dyn CompletionClient,
    system: String,
    max_transcript_words: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(client: &'a dyn CompletionClient, show_name: &str, max_transcript_words: usize) -> Self {
        Self {
            client,
            system: prompts::analysis_system(show_name),
            max_transcript_words,
        }
    }

    /// Extract one analysis from already-built content
    pub async fn extract(&self, content: &str) -> Result<Analysis, ExtractError> {
        let user = format!("{}{}", prompts::EXTRACTION_INSTRUCTIONS, content);
        let reply = self.client.complete(&self.system, &user).await?;

        let body = strip_code_fence(&reply);
        decode_analysis(body).map_err(|source| ExtractError::Decode {
            source,
            excerpt: truncate_chars(body, RAW_EXCERPT_CHARS).to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyzeSummary {
    pub total: usize,
    pub already_analyzed: usize,
    pub no_content: usize,
    pub with_transcript: usize,
    pub description_only: usize,
    pub analyzed: usize,
    pub failed: usize,
}

/// Analyze every episode with content that the checkpoint does not cover.
/// The full collection is written to `output` after each episode.
pub async fn analyze_episodes(
    extractor: &Extractor<'_>,
    episodes: &mut [Episode],
    checkpoint: &AnalysisCheckpoint,
    output: &JsonDocument,
    pacer: &mut Pacer,
) -> Result<AnalyzeSummary, PipelineError> {
    let already_analyzed = checkpoint.restore(episodes);
    if already_analyzed > 0 {
        log::info!("Found {} already-analyzed episodes (will skip)", already_analyzed);
    }

    let mut summary = AnalyzeSummary {
        total: episodes.len(),
        already_analyzed,
        ..Default::default()
    };

    let mut work = Vec::new();
    for (idx, episode) in episodes.iter().enumerate() {
        if checkpoint.contains(&episode.id) {
            continue;
        }
        if !episode.has_content() {
            summary.no_content += 1;
            continue;
        }
        if episode.has_transcript() {
            summary.with_transcript += 1;
        } else {
            summary.description_only += 1;
        }
        work.push(idx);
    }

    log::info!(
        "{} episodes need analysis ({} with transcript, {} description-only, {} without content)",
        work.len(),
        summary.with_transcript,
        summary.description_only,
        summary.no_content
    );

    for (n, &idx) in work.iter().enumerate() {
        log::info!(
            "[{}/{}] Analyzing: {}",
            n + 1,
            work.len(),
            truncate_chars(&episodes[idx].title, 60)
        );

        let Some(content) = build_content(&episodes[idx], extractor.max_transcript_words) else {
            continue;
        };

        pacer.ready().await;
        match extractor.extract(&content).await {
            Ok(analysis) => {
                log::info!("  Extracted {} use cases", analysis.use_cases.len());
                episodes[idx].analysis = Some(analysis);
                summary.analyzed += 1;
            }
            Err(e) => {
                log::warn!("  Analysis failed for {}: {}", episodes[idx].id, e);
                episodes[idx].analysis = None;
                summary.failed += 1;
            }
        }

        output.save(&*episodes)?;
    }

    output.save(&*episodes)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{analysis_with, episode, ScriptedCompletion};
    use tempfile::TempDir;

    const REPLY: &str = r#"{"guest_name": "Jane Doe", "guest_role": null, "summary": "S",
        "key_takeaways": [], "use_cases": [{"title": "Plan sprints", "description": "D",
        "tools": ["Linear"], "category": "productivity", "audience": "engineers",
        "difficulty": "advanced"}], "tools_mentioned": ["Linear"], "notable_quotes": []}"#;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    // =========================================================================
    // Content selection
    // =========================================================================

    #[test]
    fn test_long_transcript_is_capped_with_marker() {
        let text = words(15_000);
        let truncated = truncate_words(&text, 12_000);

        let tokens: Vec<&str> = truncated.split_whitespace().collect();
        assert_eq!(tokens.len(), 12_001);
        assert_eq!(tokens[11_999], "w11999");
        assert!(truncated.ends_with(" [TRUNCATED]"));
    }

    #[test]
    fn test_transcript_at_limit_is_untouched() {
        let text = format!("  {}  ", words(12_000));
        assert!(matches!(truncate_words(&text, 12_000), Cow::Borrowed(_)));
    }

    #[test]
    fn test_content_with_transcript_has_header_and_excerpt() {
        let mut ep = episode("a", "Agents at work", 600);
        ep.description = "d".repeat(800);
        ep.transcript = Some("hello world".into());

        let content = build_content(&ep, 12_000).unwrap();
        let expected = format!(
            "Episode Title: Agents at work\nEpisode Description: {}\n\nFULL TRANSCRIPT:\nhello world",
            "d".repeat(500)
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn test_content_without_transcript_uses_full_description() {
        let mut ep = episode("a", "T", 600);
        ep.description = "x".repeat(800);

        let content = build_content(&ep, 12_000).unwrap();
        assert!(content.starts_with("Episode Title: T\nEPISODE DESCRIPTION (no transcript available):\n"));
        assert!(content.ends_with(&"x".repeat(800)));
    }

    #[test]
    fn test_no_content_means_no_request() {
        let mut ep = episode("a", "T", 600);
        ep.transcript = Some("   ".into());
        assert!(build_content(&ep, 12_000).is_none());
    }

    // =========================================================================
    // Extraction
    // =========================================================================

    #[tokio::test]
    async fn test_fenced_reply_decodes_like_bare_reply() {
        let fenced = format!("```json\n{}\n```", REPLY);
        let client = ScriptedCompletion::new().reply(REPLY).reply(&fenced);
        let extractor = Extractor::new(&client, "How I AI", 12_000);

        let bare = extractor.extract("content").await.unwrap();
        let unwrapped = extractor.extract("content").await.unwrap();
        assert_eq!(bare, unwrapped);
        assert_eq!(bare.use_cases[0].title, "Plan sprints");
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_decode_error_with_excerpt() {
        let garbage = format!("Sorry, I can't. {}", "z".repeat(500));
        let client = ScriptedCompletion::new().reply(&garbage);
        let extractor = Extractor::new(&client, "How I AI", 12_000);

        match extractor.extract("content").await.unwrap_err() {
            ExtractError::Decode { excerpt, .. } => assert_eq!(excerpt.chars().count(), 200),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_content() {
        let client = ScriptedCompletion::new().reply(REPLY);
        let extractor = Extractor::new(&client, "How I AI", 12_000);
        extractor.extract("Episode Title: X").await.unwrap();

        let (system, user) = client.requests.lock().unwrap()[0].clone();
        assert!(system.contains("\"How I AI\""));
        assert!(user.starts_with("Analyze this podcast content"));
        assert!(user.ends_with("CONTENT:\nEpisode Title: X"));
    }

    // =========================================================================
    // Runs
    // =========================================================================

    #[tokio::test]
    async fn test_run_skips_checkpointed_and_empty_episodes() {
        let temp = TempDir::new().unwrap();
        let output = JsonDocument::new(temp.path().join("episodes-analyzed.json"));

        let mut with_transcript = episode("t", "Transcript", 600);
        with_transcript.transcript = Some("words words".into());
        let mut description_only = episode("d", "Description", 600);
        description_only.description = "About agents".into();
        let empty = episode("e", "Empty", 600);
        let done = episode("done", "Done", 600);

        let mut prior = done.clone();
        prior.analysis = Some(analysis_with(&["Prior use case"]));
        let checkpoint = AnalysisCheckpoint::from_episodes(&[prior]);

        let mut episodes = vec![with_transcript, description_only, empty, done];
        let client = ScriptedCompletion::new()
            .reply(REPLY)
            .fail(LlmError::Api {
                status: 529,
                body: "overloaded".into(),
            });
        let extractor = Extractor::new(&client, "How I AI", 12_000);

        let summary = analyze_episodes(
            &extractor,
            &mut episodes,
            &checkpoint,
            &output,
            &mut Pacer::unpaced(),
        )
        .await
        .unwrap();

        assert_eq!(
            summary,
            AnalyzeSummary {
                total: 4,
                already_analyzed: 1,
                no_content: 1,
                with_transcript: 1,
                description_only: 1,
                analyzed: 1,
                failed: 1,
            }
        );
        assert_eq!(client.request_count(), 2);
        assert!(episodes[0].analysis.is_some());
        assert!(episodes[1].analysis.is_none());
        assert!(episodes[2].analysis.is_none());
        assert_eq!(
            episodes[3].analysis.as_ref().unwrap().use_cases[0].title,
            "Prior use case"
        );

        let saved: Vec<Episode> = output.load().unwrap().unwrap();
        assert_eq!(saved, episodes);
        let raw = std::fs::read_to_string(output.path()).unwrap();
        assert_eq!(raw.matches("\"analysis\"").count(), 2);
    }

    #[tokio::test]
    async fn test_rerun_after_success_makes_no_requests() {
        let temp = TempDir::new().unwrap();
        let output = JsonDocument::new(temp.path().join("episodes-analyzed.json"));
        let mut ep = episode("a", "A", 600);
        ep.description = "About agents".into();

        let client = ScriptedCompletion::new().reply(REPLY);
        let extractor = Extractor::new(&client, "How I AI", 12_000);
        let mut first = vec![ep.clone()];
        analyze_episodes(&extractor, &mut first, &AnalysisCheckpoint::empty(), &output, &mut Pacer::unpaced())
            .await
            .unwrap();

        let saved: Vec<Episode> = output.load().unwrap().unwrap();
        let checkpoint = AnalysisCheckpoint::from_episodes(&saved);
        let mut second = vec![ep];
        let summary = analyze_episodes(&extractor, &mut second, &checkpoint, &output, &mut Pacer::unpaced())
            .await
            .unwrap();

        assert_eq!(summary.analyzed, 0);
        assert_eq!(summary.already_analyzed, 1);
        assert_eq!(client.request_count(), 1);
        assert_eq!(second, first);
    }
}
