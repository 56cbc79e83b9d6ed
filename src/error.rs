use thiserror::Error;

use crate::youtube::SourceError;

/// Typed error hierarchy for the pipeline stages.
///
/// Per-item failures never surface as `PipelineError`; they are logged and
/// counted inside the stage. What reaches the caller is a startup or
/// persistence failure that should stop the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Json(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{path} not found. {hint}")]
    MissingInput { path: String, hint: String },

    #[error("Set the {0} environment variable (export {0}=...)")]
    MissingCredential(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

// ── From impls ─────────────────────────────────────────────────────────────

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Json(e.to_string())
    }
}

impl From<serde_yaml::Error> for PipelineError {
    fn from(e: serde_yaml::Error) -> Self {
        PipelineError::Config(e.to_string())
    }
}
