mod parser;

use std::io::Read;
use std::path::Path;

use crate::dispatch::domain::OrderRequest;

#[derive(Debug)]
pub enum OrderImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    InvalidField {
        line: usize,
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for OrderImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderImportError::Io(err) => write!(f, "failed to read order export: {}", err),
            OrderImportError::Csv(err) => write!(f, "invalid order CSV data: {}", err),
            OrderImportError::MissingColumn(column) => {
                write!(f, "order CSV is missing the '{}' column", column)
            }
            OrderImportError::InvalidField {
                line,
                column,
                value,
            } if value.is_empty() => write!(f, "line {}: '{}' is required", line, column),
            OrderImportError::InvalidField {
                line,
                column,
                value,
            } => write!(f, "line {}: invalid {} '{}'", line, column, value),
        }
    }
}

impl std::error::Error for OrderImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderImportError::Io(err) => Some(err),
            OrderImportError::Csv(err) => Some(err),
            OrderImportError::MissingColumn(_) | OrderImportError::InvalidField { .. } => None,
        }
    }
}

impl From<std::io::Error> for OrderImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for OrderImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads order exports (`order_id,pricing_model,revenue_score,created_at`, plus any
/// display columns) into admission requests.
pub struct OrderCsvImporter;

impl OrderCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<OrderRequest>, OrderImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<OrderRequest>, OrderImportError> {
        parser::parse_orders(reader)
    }
}
