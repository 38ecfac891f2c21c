//! Upload checks run before a document reaches the pipeline

use crate::config::IntakeConfig;
use crate::error::{AnalysisError, Result};
use rgpd_extract::FileType;
use std::path::Path;

impl IntakeConfig {
    /// Check an upload's name and size, returning the file type implied by
    /// its extension
    pub fn validate(&self, file_name: &str, size: usize) -> Result<FileType> {
        if size > self.max_bytes {
            return Err(AnalysisError::Intake(format!(
                "file too large: {} bytes exceeds {} MiB",
                size,
                self.max_bytes / (1024 * 1024)
            )));
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !self.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&extension)) {
            return Err(AnalysisError::Intake(format!(
                "unsupported file extension '{}' (allowed: {})",
                extension,
                self.allowed_extensions.join(", ")
            )));
        }

        Ok(FileType::from_extension(&extension)?)
    }
}
