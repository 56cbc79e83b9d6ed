use super::Workspace;
use crate::error::PipelineError;
use crate::llm::CompletionClient;
use crate::pipeline::{
    self, AnalysisCheckpoint, AnalyzeSummary, Extractor, IndexSummary, Pacer,
};
use crate::store::Episode;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeReport {
    pub analysis: AnalyzeSummary,
    pub index: IndexSummary,
}

/// Extract analyses for the catalog, then rebuild the use-case index
pub async fn run_analyze(ws: &Workspace) -> Result<AnalyzeReport, PipelineError> {
    let client = ws.completion_client(ws.config.analysis_max_tokens)?;
    analyze_with(ws, &client).await
}

pub(crate) async fn analyze_with(
    ws: &Workspace,
    client: &dyn CompletionClient,
) -> Result<AnalyzeReport, PipelineError> {
    let mut episodes: Vec<Episode> = ws.files.catalog.load_required("Run collect first.")?;
    log::info!("Loaded {} episodes", episodes.len());

    let previous: Vec<Episode> = ws.files.analyzed.load()?.unwrap_or_default();
    let checkpoint = AnalysisCheckpoint::from_episodes(&previous);

    let extractor = Extractor::new(
        client,
        &ws.config.show_name,
        ws.config.max_transcript_words,
    );
    let mut pacer = Pacer::new(ws.config.delays.analyze());

    let analysis = pipeline::analyze_episodes(
        &extractor,
        &mut episodes,
        &checkpoint,
        &ws.files.analyzed,
        &mut pacer,
    )
    .await?;

    let index = pipeline::write_index(&episodes, &ws.files.use_cases)?;
    Ok(AnalyzeReport { analysis, index })
}
