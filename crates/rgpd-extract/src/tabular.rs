//! CSV document rendering
//!
//! The table is rendered as aligned plain text so that detection sees every
//! cell, with rows on their own lines and columns in their original order.

use crate::{
    config::ExtractorConfig, document::FileType, error::Result, ExtractError, ExtractResult,
    Extractor, PlainTextExtractor,
};
use unicode_segmentation::UnicodeSegmentation;

/// CSV text extractor
pub struct CsvExtractor {
    config: ExtractorConfig,
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl CsvExtractor {
    /// Create a new CSV extractor with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Parse CSV text into rows of cells, header first
    fn read_rows(&self, text: &str) -> Result<Vec<Vec<String>>> {
        let delimiter = self.config.csv_delimiter;
        if !delimiter.is_ascii() {
            return Err(ExtractError::Csv(format!(
                "delimiter {:?} is not an ASCII character",
                delimiter
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|field| field.trim().to_string()).collect());
        }
        Ok(rows)
    }
}

/// Render rows as right-aligned columns separated by a single space
fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let mut line = String::new();
        for (i, width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            if i > 0 {
                line.push(' ');
            }
            for _ in display_width(cell)..*width {
                line.push(' ');
            }
            line.push_str(cell);
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn display_width(cell: &str) -> usize {
    cell.graphemes(true).count()
}

impl Extractor for CsvExtractor {
    fn file_type(&self) -> FileType {
        FileType::Csv
    }

    fn extract(&self, bytes: &[u8], source: &str) -> Result<ExtractResult> {
        // Spreadsheet exports are often windows-1252; decode like plain text
        let (text, encoding) = PlainTextExtractor::decode(bytes)?;
        let rows = self.read_rows(&text)?;
        let data_rows = if self.config.csv_has_headers {
            rows.len().saturating_sub(1)
        } else {
            rows.len()
        };
        Ok(ExtractResult::new(render_table(&rows), source, FileType::Csv)
            .with_row_count(data_rows)
            .with_encoding(encoding.name()))
    }
}
