use super::Workspace;
use crate::error::PipelineError;
use crate::pipeline::{self, CollectSummary, Pacer, RecoverSummary, TranscriptCache};
use crate::store::Episode;
use crate::youtube::YtDlp;

/// Refresh the episode catalog from the configured channel
pub async fn run_collect(ws: &Workspace, force: bool) -> Result<CollectSummary, PipelineError> {
    let cache = if force {
        log::info!("--force set: ignoring cached transcripts");
        TranscriptCache::empty()
    } else {
        let previous: Vec<Episode> = ws.files.catalog.load()?.unwrap_or_default();
        TranscriptCache::from_catalog(previous)
    };
    if !cache.is_empty() {
        log::info!("Loaded {} cataloged episodes", cache.len());
    }

    let source = YtDlp::new(&ws.config.yt_dlp_path);
    let mut pacer = Pacer::new(ws.config.delays.collect());

    pipeline::collect(
        &source,
        &source,
        &ws.config.channel_url,
        &cache,
        &ws.files.catalog,
        &mut pacer,
    )
    .await
}

/// Fill catalog gaps from subtitle files
pub async fn run_recover(ws: &Workspace) -> Result<RecoverSummary, PipelineError> {
    let mut episodes: Vec<Episode> = ws.files.catalog.load_required("Run collect first.")?;

    let source = YtDlp::new(&ws.config.yt_dlp_path);
    let mut pacer = Pacer::new(ws.config.delays.recover());

    pipeline::recover_transcripts(&source, &mut episodes, &ws.files.catalog, &mut pacer).await
}
