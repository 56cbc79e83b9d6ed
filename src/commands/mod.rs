//! Stage entry points used by the binaries.
//!
//! Each command loads configuration and input files, builds the concrete
//! collaborators, and hands off to the pipeline stage.

pub mod analyze;
pub mod collect;
pub mod enrich;
pub mod index;
pub mod sample;
pub mod stats;

pub use analyze::{run_analyze, AnalyzeReport};
pub use collect::{run_collect, run_recover};
pub use enrich::run_enrich;
pub use index::run_build_index;
pub use sample::{run_sample_analysis, SampleReport};
pub use stats::{pipeline_status, PipelineStatus};

use crate::config::{self, PipelineConfig};
use crate::error::PipelineError;
use crate::llm::AnthropicClient;
use crate::store::DataFiles;
use std::path::{Path, PathBuf};

/// Configuration and data files resolved against one project directory
#[derive(Debug, Clone)]
pub struct Workspace {
    pub project_dir: PathBuf,
    pub config: PipelineConfig,
    pub files: DataFiles,
}

impl Workspace {
    pub fn open(project_dir: &Path) -> Result<Self, PipelineError> {
        let config = PipelineConfig::load(project_dir)?;
        let files = config.data_files();
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            config,
            files,
        })
    }

    /// Completion client for a stage; `max_tokens` differs per stage
    fn completion_client(&self, max_tokens: u32) -> Result<AnthropicClient, PipelineError> {
        let api_key = config::api_key(&self.project_dir)?;
        Ok(AnthropicClient::new(&api_key)
            .with_base_url(&self.config.api_base_url)
            .with_model(&self.config.model)
            .with_max_tokens(max_tokens))
    }
}
