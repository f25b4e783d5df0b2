use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for JournalError {
    fn from(err: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        JournalError::IoError(err.into_error())
    }
}

impl From<std::string::FromUtf8Error> for JournalError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        JournalError::InvalidRecord(err.to_string())
    }
}
