use super::Workspace;
use crate::error::PipelineError;
use crate::store::{Episode, UseCase};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub episodes: usize,
    pub with_transcript: usize,
    pub with_segments: usize,
    pub latest_publish: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisStats {
    pub episodes: usize,
    pub analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UseCaseStats {
    pub use_cases: usize,
    pub enriched: usize,
    pub picks: usize,
}

/// Snapshot of every pipeline file. `None` means the file has not been
/// produced yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStatus {
    pub catalog: Option<CatalogStats>,
    pub analyzed: Option<AnalysisStats>,
    pub use_cases: Option<UseCaseStats>,
}

pub fn pipeline_status(ws: &Workspace) -> Result<PipelineStatus, PipelineError> {
    let catalog = ws
        .files
        .catalog
        .load::<Vec<Episode>>()?
        .map(|episodes| CatalogStats {
            episodes: episodes.len(),
            with_transcript: episodes.iter().filter(|ep| ep.has_transcript()).count(),
            with_segments: episodes.iter().filter(|ep| ep.has_segments()).count(),
            latest_publish: episodes.iter().filter_map(Episode::published_on).max(),
        });

    let analyzed = ws
        .files
        .analyzed
        .load::<Vec<Episode>>()?
        .map(|episodes| AnalysisStats {
            episodes: episodes.len(),
            analyzed: episodes.iter().filter(|ep| ep.analysis.is_some()).count(),
        });

    let use_cases = ws
        .files
        .use_cases
        .load::<Vec<UseCase>>()?
        .map(|index| UseCaseStats {
            use_cases: index.len(),
            enriched: index.iter().filter(|uc| uc.is_enriched()).count(),
            picks: index.iter().filter(|uc| uc.is_pick == Some(true)).count(),
        });

    Ok(PipelineStatus {
        catalog,
        analyzed,
        use_cases,
    })
}

const NOT_PRODUCED: &str = "not yet produced";

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.catalog {
            Some(c) => {
                writeln!(f, "Catalog:    {} episodes", c.episodes)?;
                writeln!(f, "  with transcript: {}", c.with_transcript)?;
                writeln!(f, "  with segments:   {}", c.with_segments)?;
                match c.latest_publish {
                    Some(date) => writeln!(f, "  latest publish:  {}", date)?,
                    None => writeln!(f, "  latest publish:  unknown")?,
                }
            }
            None => writeln!(f, "Catalog:    {}", NOT_PRODUCED)?,
        }

        match &self.analyzed {
            Some(a) => writeln!(f, "Analyzed:   {}/{} episodes", a.analyzed, a.episodes)?,
            None => writeln!(f, "Analyzed:   {}", NOT_PRODUCED)?,
        }

        match &self.use_cases {
            Some(u) => {
                writeln!(f, "Use cases:  {}", u.use_cases)?;
                writeln!(f, "  enriched: {}", u.enriched)?;
                write!(f, "  picks:    {}", u.picks)
            }
            None => write!(f, "Use cases:  {}", NOT_PRODUCED),
        }
    }
}
