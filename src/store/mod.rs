pub mod models;


use crate::error::PipelineError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use models::*;

pub const EPISODES_FILE: &str = "episodes.json";
pub const ANALYZED_FILE: &str = "episodes-analyzed.json";
pub const USE_CASES_FILE: &str = "use-cases.json";

/// A flat JSON document on disk.
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so a run killed mid-write leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the document, or `None` if the file does not exist yet
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, PipelineError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PipelineError::Io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| PipelineError::Json(format!("Failed to parse {}: {}", self.path.display(), e)))
    }

    /// Load a document an earlier stage must have produced
    pub fn load_required<T: DeserializeOwned>(&self, hint: &str) -> Result<T, PipelineError> {
        self.load()?.ok_or_else(|| PipelineError::MissingInput {
            path: self.path.display().to_string(),
            hint: hint.to_string(),
        })
    }

    pub fn save<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), PipelineError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        // serde_json leaves non-ASCII text unescaped
        let bytes = serde_json::to_vec_pretty(value)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| {
            PipelineError::Io(format!("Failed to write {}: {}", self.path.display(), e.error))
        })?;

        Ok(())
    }
}

/// The three documents the pipeline stages hand to each other.
#[derive(Debug, Clone)]
pub struct DataFiles {
    pub catalog: JsonDocument,
    pub analyzed: JsonDocument,
    pub use_cases: JsonDocument,
}

impl DataFiles {
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            catalog: JsonDocument::new(data_dir.join(EPISODES_FILE)),
            analyzed: JsonDocument::new(data_dir.join(ANALYZED_FILE)),
            use_cases: JsonDocument::new(data_dir.join(USE_CASES_FILE)),
        }
    }
}
