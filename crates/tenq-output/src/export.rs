//! Export of filing listings.
//!
//! Listings are written as CSV (one row per filing, fixed header), as
//! pretty-printed JSON, or as the same left-aligned table printed on the
//! terminal.

use crate::table::{COLUMNS, render_table};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tenq_data::edgar::FilingRecord;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Pretty-printed JSON format.
    Json,

    /// Left-aligned plain-text table.
    Text,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_csv(records: &[FilingRecord]) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for [FilingRecord] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Text => Ok(render_table(self)),
        }
    }
}

impl Exporter for Vec<FilingRecord> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        self.as_slice().export_to_string(format)
    }
}

/// Default file name for an export of `form` filings.
///
/// Non-alphanumeric characters are dropped from the form type and quarters
/// are joined with `-`.
///
/// # Example
/// ```
/// use tenq_output::{ExportFormat, export_file_name};
///
/// assert_eq!(
///     export_file_name("10-Q", 2024, &[1, 2], ExportFormat::Csv),
///     "10Q_filings_2024_Q1-2.csv"
/// );
/// ```
pub fn export_file_name(form: &str, year: i32, quarters: &[u8], format: ExportFormat) -> String {
    let form: String = form.chars().filter(char::is_ascii_alphanumeric).collect();
    let quarters = quarters
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join("-");
    format!("{form}_filings_{year}_Q{quarters}.{}", format.extension())
}
