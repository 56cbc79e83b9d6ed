use super::Workspace;
use crate::error::PipelineError;
use crate::pipeline::{self, IndexSummary};
use crate::store::Episode;

/// Rebuild the use-case index from the analyzed episodes file
pub fn run_build_index(ws: &Workspace) -> Result<IndexSummary, PipelineError> {
    let episodes: Vec<Episode> = ws.files.analyzed.load_required("Run analyze first.")?;
    pipeline::write_index(&episodes, &ws.files.use_cases)
}
