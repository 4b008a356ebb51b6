use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0} columns exceed the spreadsheet limit of {max}", max = crate::xlsx::MAX_COLUMNS)]
    TooManyColumns(usize),

    #[error("{0} rows exceed the spreadsheet limit of {max}", max = crate::xlsx::MAX_ROWS)]
    TooManyRows(usize),

    #[error("unknown export format '{0}' (expected csv or xlsx)")]
    UnknownFormat(String),
}
