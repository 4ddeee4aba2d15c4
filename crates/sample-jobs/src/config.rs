use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::JobError;

pub const DEFAULT_EXTENSION: &str = "wav";

/// Everything a single copy job needs, handed to the worker by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    /// Lower-cased, without a leading dot.
    pub extension: String,
}

impl JobConfig {
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    pub fn validate(&self) -> Result<(), JobError> {
        if is_empty_path(&self.source_root) || is_empty_path(&self.dest_root) {
            return Err(JobError::Validation(
                "Please select both source and destination folders.".to_string(),
            ));
        }
        if self.extension.is_empty() {
            return Err(JobError::Validation("file extension must not be empty".to_string()));
        }
        Ok(())
    }
}

/// `".WAV"` and `"wav"` both become `"wav"`.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn is_empty_path(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
