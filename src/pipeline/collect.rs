//! Catalog collection: channel listing plus timed transcripts

use super::pacer::Pacer;
use super::resume::TranscriptCache;
use super::truncate_chars;
use crate::error::PipelineError;
use crate::store::{Episode, JsonDocument, TranscriptSegment};
use crate::youtube::{RawVideoEntry, SourceError, TranscriptSource, VideoSource};
use serde::Serialize;
use std::collections::HashSet;

/// Videos shorter than this are Shorts and never enter the catalog
pub const MIN_DURATION_SECONDS: f64 = 60.0;
pub const PRIMARY_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectSummary {
    pub listed: usize,
    pub discarded: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
    pub retained: usize,
}

/// Turn raw listing entries into catalog episodes, in listing order.
/// Null entries, entries without an id, Shorts and repeated ids are dropped.
pub fn episodes_from_listing(entries: Vec<Option<RawVideoEntry>>) -> (Vec<Episode>, usize) {
    let total = entries.len();
    let mut seen = HashSet::new();
    let mut episodes = Vec::with_capacity(total);

    for entry in entries.into_iter().flatten() {
        let Some(id) = entry.id.filter(|id| !id.trim().is_empty()) else {
            continue;
        };
        let duration = match entry.duration {
            Some(d) if d.is_finite() && d >= MIN_DURATION_SECONDS => d,
            _ => continue,
        };
        if !seen.insert(id.clone()) {
            continue;
        }

        episodes.push(Episode {
            url: Episode::watch_url(&id),
            id,
            title: entry.title.unwrap_or_default(),
            description: entry.description.unwrap_or_default(),
            publish_date: entry.upload_date,
            duration_seconds: duration as u64,
            thumbnail_url: entry.thumbnail,
            transcript: None,
            transcript_segments: None,
            analysis: None,
        });
    }

    let discarded = total - episodes.len();
    (episodes, discarded)
}

/// English first, then every other advertised track in turn.
pub async fn fetch_transcript(
    source: &dyn TranscriptSource,
    video_id: &str,
) -> Result<Vec<TranscriptSegment>, SourceError> {
    let primary_error = match source.fetch(video_id, PRIMARY_LANGUAGE).await {
        Ok(segments) if !segments.is_empty() => return Ok(segments),
        Ok(_) => SourceError::Unavailable {
            what: "caption text".into(),
            video_id: video_id.to_string(),
        },
        Err(e) => e,
    };

    let languages = match source.list_languages(video_id).await {
        Ok(languages) => languages,
        Err(e) => {
            log::debug!("Could not list caption tracks for {}: {}", video_id, e);
            return Err(primary_error);
        }
    };

    for language in languages.iter().filter(|l| l.as_str() != PRIMARY_LANGUAGE) {
        match source.fetch(video_id, language).await {
            Ok(segments) if !segments.is_empty() => {
                log::info!("Using {} captions for {}", language, video_id);
                return Ok(segments);
            }
            Ok(_) => continue,
            Err(e) => log::debug!("{} captions failed for {}: {}", language, video_id, e),
        }
    }

    Err(primary_error)
}

/// Refresh the catalog from the channel listing, fetching transcripts that
/// are not already cached. The catalog is saved after every fetch.
pub async fn collect(
    videos: &dyn VideoSource,
    transcripts: &dyn TranscriptSource,
    channel: &str,
    cache: &TranscriptCache,
    catalog: &JsonDocument,
    pacer: &mut Pacer,
) -> Result<CollectSummary, PipelineError> {
    log::info!("Fetching video list from {}", channel);
    pacer.ready().await;
    let entries = videos.list_videos(channel).await?;

    let listed_count = entries.len();
    let (mut episodes, discarded) = episodes_from_listing(entries);
    log::info!(
        "Found {} videos ({} discarded as shorts or unusable)",
        episodes.len(),
        discarded
    );

    // Seed every episode from the cache so a partial save never holds fewer
    // transcripts than the previous catalog
    for episode in episodes.iter_mut() {
        if let Some(cached) = cache.get(&episode.id) {
            episode.transcript = cached.transcript;
            episode.transcript_segments = cached.segments;
        }
    }

    let listed_len = episodes.len();
    let retained = {
        let listed: HashSet<&str> = episodes.iter().map(|e| e.id.as_str()).collect();
        cache.unlisted(&listed)
    };
    if !retained.is_empty() {
        log::info!(
            "Keeping {} previously cataloged episodes missing from the listing",
            retained.len()
        );
    }

    let mut summary = CollectSummary {
        listed: listed_count,
        discarded,
        retained: retained.len(),
        ..Default::default()
    };
    episodes.extend(retained);

    for idx in 0..listed_len {
        let id = episodes[idx].id.clone();

        if cache.is_complete(&id) {
            summary.skipped += 1;
            continue;
        }

        log::info!(
            "[{}/{}] Fetching transcript for: {}",
            idx + 1,
            listed_len,
            truncate_chars(&episodes[idx].title, 60)
        );

        pacer.ready().await;
        match fetch_transcript(transcripts, &id).await {
            Ok(segments) => {
                let text = segments
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                log::info!("  Got {} words", text.split_whitespace().count());
                episodes[idx].transcript = Some(text);
                episodes[idx].transcript_segments = Some(segments);
                summary.fetched += 1;
            }
            Err(e) => {
                log::warn!("  No transcript for {}: {}", id, e);
                summary.failed += 1;
            }
        }

        catalog.save(&episodes)?;
    }

    catalog.save(&episodes)?;
    Ok(summary)
}
