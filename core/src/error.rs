use crate::chart::ChartError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook write error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Chart rendering error: {0}")]
    Chart(#[from] ChartError),

    #[error("No dataset matching '{prefix}YYYY-MM-DD.xlsx' found in {dir}")]
    DatasetNotFound { dir: String, prefix: String },

    #[error("Sheet '{name}' not found in workbook")]
    MissingSheet { name: String },

    #[error("Relation '{relation}' has no column '{column}'")]
    MissingColumn { relation: String, column: String },

    #[error("Unsupported input file: {path}")]
    UnsupportedInput { path: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
