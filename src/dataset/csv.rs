//! Delimited text datasets.
//!
//! Handles a header row, double-quoted fields with `""` escapes and CRLF line
//! endings. Quoted fields spanning several lines are not supported.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::RatingSource;
use crate::config::settings::AnalysisSettings;
use crate::domain::RatingSample;
use crate::errors::{AnalysisError, AnalysisResult};

const PREVIEW_ROWS: usize = 5;

/// Header plus raw string records of a delimited file
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDataset {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl CsvDataset {
    pub fn parse(content: &str, delimiter: char) -> AnalysisResult<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_idx, header_line) = lines
            .next()
            .ok_or_else(|| AnalysisError::DataLoad("dataset is empty".to_string()))?;
        let headers = split_record(header_line, delimiter, header_idx + 1)?;

        let records = lines
            .map(|(idx, line)| split_record(line, delimiter, idx + 1))
            .collect::<AnalysisResult<Vec<_>>>()?;

        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `rows` records
    pub fn head(&self, rows: usize) -> &[Vec<String>] {
        &self.records[..rows.min(self.records.len())]
    }

    pub fn column_index(&self, column: &str) -> AnalysisResult<usize> {
        self.headers
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| {
                AnalysisError::DataLoad(format!(
                    "column '{}' not found, available columns: {}",
                    column,
                    self.headers.join(", ")
                ))
            })
    }

    /// Parses every cell of `column` as a rating
    pub fn ratings(&self, column: &str) -> AnalysisResult<RatingSample> {
        let idx = self.column_index(column)?;

        if self.records.is_empty() {
            return Err(AnalysisError::DataLoad(
                "dataset has no data rows".to_string(),
            ));
        }

        let values = self
            .records
            .iter()
            .enumerate()
            .map(|(row, record)| parse_cell(record, idx, row + 1))
            .collect::<AnalysisResult<Vec<f64>>>()?;

        RatingSample::new(values)
    }
}

fn parse_cell(record: &[String], idx: usize, row: usize) -> AnalysisResult<f64> {
    let cell = record.get(idx).ok_or_else(|| {
        AnalysisError::DataLoad(format!(
            "row {} has {} fields, expected at least {}",
            row,
            record.len(),
            idx + 1
        ))
    })?;

    cell.parse::<f64>().map_err(|_| {
        AnalysisError::DataLoad(format!("row {}: rating is not numeric: '{}'", row, cell))
    })
}

fn split_record(line: &str, delimiter: char, line_no: usize) -> AnalysisResult<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => field.push(c),
        }
    }

    if in_quotes {
        return Err(AnalysisError::DataLoad(format!(
            "line {}: unterminated quoted field",
            line_no
        )));
    }

    fields.push(field.trim().to_string());
    Ok(fields)
}

/// Ratings read from one column of a delimited file
#[derive(Debug, Clone)]
pub struct CsvRatingSource {
    path: PathBuf,
    column: String,
    delimiter: char,
}

impl CsvRatingSource {
    pub fn new<P: AsRef<Path>>(path: P, column: &str, delimiter: char) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            column: column.to_string(),
            delimiter,
        }
    }

    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self::new(
            &settings.dataset_path,
            &settings.rating_column,
            settings.delimiter,
        )
    }

    pub fn load_dataset(&self) -> AnalysisResult<CsvDataset> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            AnalysisError::DataLoad(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        CsvDataset::parse(&content, self.delimiter)
    }

    fn log_preview(&self, dataset: &CsvDataset) {
        info!("  {}", dataset.headers().join(" | "));
        for record in dataset.head(PREVIEW_ROWS) {
            info!("  {}", record.join(" | "));
        }
    }
}

impl RatingSource for CsvRatingSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> AnalysisResult<RatingSample> {
        let dataset = self.load_dataset()?;
        info!("Loaded {} rows from {}", dataset.len(), self.path.display());

        self.log_preview(&dataset);
        dataset.ratings(&self.column)
    }
}
