//! Resume state carried from one run of a stage into the next.
//!
//! Both types are built from the stage's previous output and handed to the
//! stage explicitly; nothing is re-read from disk mid-run.

use crate::store::{Analysis, Episode, TranscriptSegment};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct CachedTranscript {
    pub transcript: Option<String>,
    pub segments: Option<Vec<TranscriptSegment>>,
}

impl CachedTranscript {
    /// Timed segments and joined text both present: nothing left to fetch
    pub fn is_complete(&self) -> bool {
        self.transcript.as_deref().is_some_and(|t| !t.trim().is_empty())
            && self.segments.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Transcripts already in the catalog, keyed by video id.
///
/// The previous catalog is kept whole so episodes that dropped out of the
/// channel listing can be carried forward.
#[derive(Debug, Default)]
pub struct TranscriptCache {
    previous: Vec<Episode>,
    by_id: HashMap<String, usize>,
}

impl TranscriptCache {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_catalog(previous: Vec<Episode>) -> Self {
        let mut by_id = HashMap::with_capacity(previous.len());
        for (idx, episode) in previous.iter().enumerate() {
            by_id.entry(episode.id.clone()).or_insert(idx);
        }
        Self { previous, by_id }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<CachedTranscript> {
        let episode = &self.previous[*self.by_id.get(id)?];
        Some(CachedTranscript {
            transcript: episode.transcript.clone(),
            segments: episode.transcript_segments.clone(),
        })
    }

    pub fn is_complete(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.is_complete())
    }

    /// Cached episodes whose ids are not in `listed`, in their prior order
    pub fn unlisted(&self, listed: &HashSet<&str>) -> Vec<Episode> {
        self.previous
            .iter()
            .enumerate()
            .filter(|(idx, ep)| self.by_id.get(&ep.id) == Some(idx))
            .filter(|(_, ep)| !listed.contains(ep.id.as_str()))
            .map(|(_, ep)| ep.clone())
            .collect()
    }
}

/// Analyses persisted by earlier extraction runs, keyed by episode id.
#[derive(Debug, Default)]
pub struct AnalysisCheckpoint {
    analyses: HashMap<String, Analysis>,
}

impl AnalysisCheckpoint {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Only episodes that actually carry an analysis are checkpointed
    pub fn from_episodes(episodes: &[Episode]) -> Self {
        let analyses = episodes
            .iter()
            .filter_map(|ep| ep.analysis.clone().map(|a| (ep.id.clone(), a)))
            .collect();
        Self { analyses }
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.analyses.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Analysis> {
        self.analyses.get(id)
    }

    /// Copy checkpointed analyses onto matching episodes. Returns how many
    /// episodes were restored.
    pub fn restore(&self, episodes: &mut [Episode]) -> usize {
        let mut restored = 0;
        for episode in episodes.iter_mut() {
            if let Some(analysis) = self.analyses.get(&episode.id) {
                episode.analysis = Some(analysis.clone());
                restored += 1;
            }
        }
        restored
    }
}
