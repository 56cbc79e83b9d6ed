use super::Workspace;
use crate::error::PipelineError;
use crate::pipeline::{self, IndexSummary};
use crate::store::Episode;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub episodes: usize,
    pub index: IndexSummary,
}

/// Write placeholder analyses for every cataloged episode and rebuild the
/// index from them. Makes no network calls.
pub fn run_sample_analysis(ws: &Workspace) -> Result<SampleReport, PipelineError> {
    let mut episodes: Vec<Episode> = ws.files.catalog.load_required("Run collect first.")?;
    log::info!("Generating sample analysis for {} episodes", episodes.len());

    let count = pipeline::generate_samples(&mut episodes);
    ws.files.analyzed.save(&episodes)?;
    let index = pipeline::write_index(&episodes, &ws.files.use_cases)?;

    Ok(SampleReport {
        episodes: count,
        index,
    })
}
