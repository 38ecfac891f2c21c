//! Input documents and their declared file types

use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Declared type of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Portable Document Format
    Pdf,
    /// Comma-separated values with a header row
    Csv,
    /// Plain text in any detectable encoding
    #[serde(rename = "txt")]
    PlainText,
}

impl FileType {
    /// All supported file types
    pub const ALL: [FileType; 3] = [FileType::Pdf, FileType::Csv, FileType::PlainText];

    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Csv => "csv",
            FileType::PlainText => "txt",
        }
    }

    /// MIME type for this file type
    pub fn mime_type(&self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Csv => "text/csv",
            FileType::PlainText => "text/plain",
        }
    }

    /// Resolve a file type from an extension such as `pdf` or `.CSV`
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Ok(FileType::Pdf),
            "csv" => Ok(FileType::Csv),
            "txt" => Ok(FileType::PlainText),
            _ => Err(ExtractError::UnsupportedFormat(ext)),
        }
    }

    /// Resolve a file type from a MIME type, ignoring parameters like `charset`
    pub fn from_mime(mime: &str) -> Result<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        FileType::ALL
            .into_iter()
            .find(|t| t.mime_type() == essence)
            .ok_or(ExtractError::UnsupportedFormat(essence))
    }

    /// Resolve a file type from a file name's extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => Err(ExtractError::UnsupportedFormat(
                path.to_string_lossy().to_string(),
            )),
        }
    }
}

impl FromStr for FileType {
    type Err = ExtractError;

    /// Parse a transport-level file type tag
    fn from_str(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        if tag.contains('/') {
            return Self::from_mime(tag);
        }
        match tag.to_ascii_lowercase().as_str() {
            "text" | "plain" | "plain-text" | "plaintext" => Ok(FileType::PlainText),
            _ => Self::from_extension(tag),
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Raw document submitted for analysis
#[derive(Debug, Clone)]
pub struct Document {
    /// Original file name, as uploaded
    pub file_name: String,
    /// Declared file type
    pub file_type: FileType,
    /// Raw file content
    pub bytes: Vec<u8>,
}

impl Document {
    /// Create a document from raw bytes and a declared type
    pub fn new(
        file_name: impl Into<String>,
        file_type: FileType,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_type,
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk, inferring the type from the extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_type = FileType::from_path(path)?;
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(file_name, file_type, bytes))
    }

    /// Size of the raw content in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
