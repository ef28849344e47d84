use thiserror::Error;

#[derive(Error, Debug)]
pub enum RevenueReportError {
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn { table: &'static str, column: String },

    #[error("Invalid date in column '{column}': '{value}' (expected YYYY-MM-DD, DD/MM/YYYY or YYYY/MM/DD)")]
    InvalidDate { column: &'static str, value: String },

    #[error("Invalid probability '{0}': expected a percentage string such as \"45%\"")]
    InvalidProbability(String),

    #[error("Invalid numeric value in column '{column}': '{value}'")]
    InvalidNumber { column: &'static str, value: String },

    #[error("Invalid month key '{0}': expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RevenueReportError>;
