//! Pipeline stages
//!
//! Each stage takes its collaborators, its loaded input and an explicit
//! resume state, and persists after every unit of work.

pub mod analyze;
pub mod collect;
pub mod decode;
pub mod enrich;
pub mod index;
pub mod pacer;
pub mod prompts;
pub mod recover;
pub mod resume;
pub mod sample;

#[cfg(test)]
pub(crate) mod testing;

pub use analyze::{analyze_episodes, AnalyzeSummary, Extractor};
pub use collect::{collect, CollectSummary};
pub use enrich::{enrich_use_cases, EnrichOptions, EnrichSummary, Enricher};
pub use index::{build_index, carry_enrichment, write_index, IndexSummary};
pub use pacer::Pacer;
pub use recover::{recover_transcripts, RecoverSummary};
pub use resume::{AnalysisCheckpoint, TranscriptCache};
pub use sample::generate_samples;

/// First `max_chars` characters of `s`
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
