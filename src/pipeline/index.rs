//! Flattened use-case index built from episode analyses

use crate::error::PipelineError;
use crate::store::{Episode, JsonDocument, UseCase};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// One record per use case, in episode order then use-case order.
/// Always a full rebuild; records carry no enrichment.
pub fn build_index(episodes: &[Episode]) -> Vec<UseCase> {
    let mut index = Vec::new();

    for episode in episodes {
        let Some(analysis) = episode.analysis.as_ref() else {
            continue;
        };

        let mut occurrences: HashMap<(&str, &str), usize> = HashMap::new();
        for uc in &analysis.use_cases {
            let seen = occurrences
                .entry((uc.title.as_str(), uc.description.as_str()))
                .or_insert(0);
            let id = UseCase::derive_id(&episode.id, &uc.title, &uc.description, *seen);
            *seen += 1;

            index.push(UseCase {
                id,
                title: uc.title.clone(),
                description: uc.description.clone(),
                tools: uc.tools.clone(),
                category: uc.category,
                audience: uc.audience,
                difficulty: uc.difficulty,
                episode_id: episode.id.clone(),
                episode_title: episode.title.clone(),
                guest_name: analysis.guest_name.clone(),
                publish_date: episode.publish_date.clone(),
                intents: None,
                is_pick: None,
                pick_reason: None,
            });
        }
    }

    index
}

/// Copy enrichment from `previous` onto records with the same id.
/// Returns how many records were carried over.
pub fn carry_enrichment(index: &mut [UseCase], previous: &[UseCase]) -> usize {
    let enriched: HashMap<Uuid, &UseCase> = previous
        .iter()
        .filter(|uc| uc.is_enriched())
        .map(|uc| (uc.id, uc))
        .collect();

    let mut carried = 0;
    for uc in index.iter_mut() {
        if let Some(enrichment) = enriched.get(&uc.id).and_then(|prev| prev.enrichment()) {
            uc.set_enrichment(enrichment);
            carried += 1;
        }
    }
    carried
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexSummary {
    pub use_cases: usize,
    pub episodes: usize,
    pub carried: usize,
}

/// Rebuild the index from `episodes`, carry enrichment over from the index
/// currently at `doc`, and write the result.
pub fn write_index(episodes: &[Episode], doc: &JsonDocument) -> Result<IndexSummary, PipelineError> {
    let mut index = build_index(episodes);

    let previous: Vec<UseCase> = match doc.load() {
        Ok(previous) => previous.unwrap_or_default(),
        Err(e) => {
            log::warn!("Ignoring unreadable previous index: {}", e);
            Vec::new()
        }
    };
    let carried = carry_enrichment(&mut index, &previous);
    if carried > 0 {
        log::info!("Carried enrichment over for {} use cases", carried);
    }

    doc.save(&index)?;

    Ok(IndexSummary {
        use_cases: index.len(),
        episodes: episodes
            .iter()
            .filter(|ep| ep.analysis.as_ref().is_some_and(|a| !a.use_cases.is_empty()))
            .count(),
        carried,
    })
}
