use super::Workspace;
use crate::error::PipelineError;
use crate::llm::CompletionClient;
use crate::pipeline::{self, EnrichOptions, EnrichSummary, Enricher, Pacer};
use crate::store::UseCase;

/// Tag the use-case index with intents and picks
pub async fn run_enrich(ws: &Workspace, force: bool) -> Result<EnrichSummary, PipelineError> {
    let client = ws.completion_client(ws.config.enrichment_max_tokens)?;
    enrich_with(ws, &client, force).await
}

pub(crate) async fn enrich_with(
    ws: &Workspace,
    client: &dyn CompletionClient,
    force: bool,
) -> Result<EnrichSummary, PipelineError> {
    let mut use_cases: Vec<UseCase> = ws.files.use_cases.load_required("Run analyze first.")?;
    log::info!("Loaded {} use cases", use_cases.len());

    let enricher = Enricher::new(client, &ws.config.show_name);
    let options = EnrichOptions {
        batch_size: ws.config.batch_size,
        force,
    };
    let mut pacer = Pacer::new(ws.config.delays.enrich());

    pipeline::enrich_use_cases(&enricher, &mut use_cases, &ws.files.use_cases, options, &mut pacer)
        .await
}
