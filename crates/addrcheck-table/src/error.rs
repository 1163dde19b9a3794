use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),
    #[error("xlsx error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("table has no header row")]
    MissingHeader,
    #[error("table is too large for a worksheet")]
    TooLarge,
    #[error("report has {report} rows but the table has {table}")]
    RowMismatch { table: usize, report: usize },
}

pub type Result<T> = std::result::Result<T, TableError>;
