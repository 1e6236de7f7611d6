// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files with encoding detection and error handling

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::warn;

use crate::domain::csv::{CsvField, CsvRow, Dataset};
use crate::domain::error::AppError;

/// CSV parser with encoding detection
pub struct CsvParser {
    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { trim: true }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse raw bytes, decoding them first
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Dataset, AppError> {
        let content = Self::decode(bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string.
    ///
    /// Blank lines are skipped; short rows read as blank cells.
    pub fn parse_content(&self, content: &str) -> Result<Dataset, AppError> {
        let mut reader = ReaderBuilder::new()
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        // Get headers
        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::ParseError("CSV has no header row".to_string()));
        }

        // Parse rows
        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(Self::parse_row(index, &headers, &record));
        }

        Ok(Dataset::new(
            headers.iter().map(str::to_string).collect(),
            rows,
        ))
    }

    /// UTF-8 (BOM stripped) when valid, otherwise Windows-1252
    fn decode(bytes: &[u8]) -> String {
        let (content, had_errors) = UTF_8.decode_with_bom_removal(bytes);
        if !had_errors {
            return content.into_owned();
        }

        warn!("CSV is not valid UTF-8, decoding as Windows-1252");
        let (content, _, _) = WINDOWS_1252.decode(bytes);
        content.into_owned()
    }

    /// Parse a single CSV row
    fn parse_row(index: usize, headers: &StringRecord, record: &StringRecord) -> CsvRow {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = record.get(idx).unwrap_or("").to_string();
                CsvField::new(header.to_string(), value)
            })
            .collect();

        CsvRow::new(index, fields)
    }
}
