//! Transcript recovery from subtitle files, for episodes the timed
//! transcript source could not serve.

use super::pacer::Pacer;
use super::truncate_chars;
use crate::error::PipelineError;
use crate::store::{Episode, JsonDocument};
use crate::youtube::subtitles::clean_subtitle_text;
use crate::youtube::SubtitleSource;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecoverSummary {
    pub missing: usize,
    pub recovered: usize,
    pub still_missing: usize,
    pub with_transcript: usize,
    pub total: usize,
}

/// Fill in plain-text transcripts for every episode that has none.
/// Segments are never set here. The catalog is saved after each episode.
pub async fn recover_transcripts(
    subtitles: &dyn SubtitleSource,
    episodes: &mut [Episode],
    catalog: &JsonDocument,
    pacer: &mut Pacer,
) -> Result<RecoverSummary, PipelineError> {
    let missing: Vec<usize> = episodes
        .iter()
        .enumerate()
        .filter(|(_, ep)| !ep.has_transcript())
        .map(|(idx, _)| idx)
        .collect();

    log::info!(
        "Found {} episodes missing transcripts out of {} total",
        missing.len(),
        episodes.len()
    );

    let mut summary = RecoverSummary {
        missing: missing.len(),
        total: episodes.len(),
        ..Default::default()
    };

    for (n, &idx) in missing.iter().enumerate() {
        log::info!(
            "[{}/{}] Downloading subtitles for: {}",
            n + 1,
            missing.len(),
            truncate_chars(&episodes[idx].title, 60)
        );

        pacer.ready().await;
        let text = match subtitles.download_subtitles(&episodes[idx].id).await {
            Ok(content) => clean_subtitle_text(&content),
            Err(e) => {
                log::warn!("  Subtitle download failed for {}: {}", episodes[idx].id, e);
                String::new()
            }
        };

        if text.is_empty() {
            summary.still_missing += 1;
        } else {
            log::info!("  Got {} words", text.split_whitespace().count());
            episodes[idx].transcript = Some(text);
            summary.recovered += 1;
        }

        catalog.save(&*episodes)?;
    }

    summary.with_transcript = episodes.iter().filter(|ep| ep.has_transcript()).count();
    Ok(summary)
}
