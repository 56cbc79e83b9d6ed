//! Batched intent tagging and pick selection over the use-case index

use super::decode::{decode_judgments, Judgment};
use super::pacer::Pacer;
use super::prompts;
use super::truncate_chars;
use crate::error::PipelineError;
use crate::llm::{strip_code_fence, CompletionClient};
use crate::store::{Enrichment, Intent, JsonDocument, UseCase};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

const DESCRIPTION_EXCERPT_CHARS: usize = 120;
const MAX_LISTED_TOOLS: usize = 5;
const RAW_EXCERPT_CHARS: usize = 300;

#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
    pub batch_size: usize,
    pub force: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichSummary {
    pub total: usize,
    pub already_enriched: usize,
    pub batches: usize,
    pub batches_skipped: usize,
    pub batches_failed: usize,
    pub updated: usize,
    pub picks: usize,
    pub distribution: Vec<(Intent, usize)>,
}

/// One prompt line per use case, labelled with its absolute index
pub fn format_batch(use_cases: &[UseCase], start: usize) -> String {
    use_cases
        .iter()
        .enumerate()
        .map(|(i, uc)| {
            let tools: Vec<&str> = uc
                .tools
                .iter()
                .take(MAX_LISTED_TOOLS)
                .map(String::as_str)
                .collect();
            format!(
                "[{}] {} | {} | Category: {} | Audience: {} | Tools: {}",
                start + i,
                uc.title,
                truncate_chars(&uc.description, DESCRIPTION_EXCERPT_CHARS),
                uc.category,
                uc.audience,
                tools.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply judgments to the records in `batch`. Judgments pointing outside the
/// batch that was sent are ignored; a repeated index keeps the last judgment.
/// Returns how many distinct records were updated.
pub fn apply_judgments(use_cases: &mut [UseCase], batch: Range<usize>, judgments: Vec<Judgment>) -> usize {
    let mut updated = HashSet::new();
    for judgment in judgments {
        if !batch.contains(&judgment.index) || judgment.index >= use_cases.len() {
            log::debug!("Ignoring judgment for index {} outside {:?}", judgment.index, batch);
            continue;
        }
        let enrichment = Enrichment::new(judgment.intents, judgment.is_pick, judgment.pick_reason);
        use_cases[judgment.index].set_enrichment(enrichment);
        updated.insert(judgment.index);
    }
    updated.len()
}

/// Intent counts across the whole index, most frequent first (ties by name)
pub fn intent_distribution(use_cases: &[UseCase]) -> Vec<(Intent, usize)> {
    let mut counts: BTreeMap<&'static str, (Intent, usize)> = BTreeMap::new();
    for intent in use_cases.iter().filter_map(|uc| uc.intents.as_ref()).flatten() {
        counts.entry(intent.as_str()).or_insert((*intent, 0)).1 += 1;
    }

    let mut distribution: Vec<(Intent, usize)> = counts.into_values().collect();
    // BTreeMap order is by name, and the sort is stable
    distribution.sort_by(|a, b| b.1.cmp(&a.1));
    distribution
}

pub struct Enricher<'a> {
    client: &'a dyn CompletionClient,
    system: String,
}

impl<'a> Enricher<'a> {
    pub fn new(client: &'a dyn CompletionClient, show_name: &str) -> Self {
        Self {
            client,
            system: prompts::enrichment_system(show_name),
        }
    }

    /// Request judgments for one batch; `None` when the request or the
    /// reply failed, which leaves the batch for the next run.
    async fn judge(&self, batch: &[UseCase], start: usize) -> Option<Vec<Judgment>> {
        let user = format!("{}{}", prompts::ENRICHMENT_INSTRUCTIONS, format_batch(batch, start));

        let reply = match self.client.complete(&self.system, &user).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("  API error: {}", e);
                return None;
            }
        };

        let body = strip_code_fence(&reply);
        match decode_judgments(body) {
            Ok(judgments) if !judgments.is_empty() => Some(judgments),
            Ok(_) => {
                log::warn!("  Reply contained no usable judgments");
                None
            }
            Err(e) => {
                log::warn!(
                    "  {} (raw response: {}...)",
                    e,
                    truncate_chars(body, RAW_EXCERPT_CHARS)
                );
                None
            }
        }
    }
}

/// Tag the index in fixed-size batches, saving after every batch that
/// produced judgments.
pub async fn enrich_use_cases(
    enricher: &Enricher<'_>,
    use_cases: &mut [UseCase],
    output: &JsonDocument,
    options: EnrichOptions,
    pacer: &mut Pacer,
) -> Result<EnrichSummary, PipelineError> {
    let batch_size = options.batch_size.max(1);
    let already_enriched = use_cases.iter().filter(|uc| uc.is_enriched()).count();

    let mut summary = EnrichSummary {
        total: use_cases.len(),
        already_enriched,
        batches: use_cases.len().div_ceil(batch_size),
        ..Default::default()
    };

    if already_enriched > 0 && !options.force {
        log::info!(
            "{} use cases already enriched. Use --force to re-enrich.",
            already_enriched
        );
    }

    if !use_cases.is_empty() && already_enriched == use_cases.len() && !options.force {
        log::info!("All use cases already enriched. Nothing to do.");
        summary.batches_skipped = summary.batches;
        summary.picks = count_picks(use_cases);
        summary.distribution = intent_distribution(use_cases);
        return Ok(summary);
    }

    for batch_num in 0..summary.batches {
        let start = batch_num * batch_size;
        let end = (start + batch_size).min(use_cases.len());

        if !options.force && use_cases[start..end].iter().all(UseCase::is_enriched) {
            log::info!(
                "[Batch {}/{}] Skipping, already enriched",
                batch_num + 1,
                summary.batches
            );
            summary.batches_skipped += 1;
            continue;
        }

        log::info!(
            "[Batch {}/{}] Enriching use cases {}-{}",
            batch_num + 1,
            summary.batches,
            start,
            end - 1
        );

        pacer.ready().await;
        let Some(judgments) = enricher.judge(&use_cases[start..end], start).await else {
            log::warn!("  Failed, skipping batch");
            summary.batches_failed += 1;
            continue;
        };

        summary.updated += apply_judgments(use_cases, start..end, judgments);
        output.save(&*use_cases)?;
    }

    summary.picks = count_picks(use_cases);
    summary.distribution = intent_distribution(use_cases);
    Ok(summary)
}

fn count_picks(use_cases: &[UseCase]) -> usize {
    use_cases.iter().filter(|uc| uc.is_pick == Some(true)).count()
}
