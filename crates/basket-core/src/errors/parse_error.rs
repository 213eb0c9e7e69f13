//! Transaction parsing errors.

use super::error_code::{self, BasketErrorCode};

/// Errors that make an entire input unusable.
///
/// Individual malformed rows are never errors; they are skipped and counted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("CSV content cannot be empty. Please upload a file.")]
    EmptyInput,

    #[error("Input could not be read: {message}")]
    Unreadable { message: String },

    #[error("Column '{column}' not found in header (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("Invalid parse option: {message}")]
    InvalidOption { message: String },

    #[error("No usable transactions: {rows_read} rows read, {rows_skipped} skipped")]
    NoTransactions { rows_read: usize, rows_skipped: usize },
}

impl BasketErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => error_code::PARSE_EMPTY_INPUT,
            Self::Unreadable { .. } => error_code::PARSE_UNREADABLE,
            Self::MissingColumn { .. } => error_code::PARSE_MISSING_COLUMN,
            Self::InvalidOption { .. } => error_code::PARSE_INVALID_OPTION,
            Self::NoTransactions { .. } => error_code::PARSE_NO_TRANSACTIONS,
        }
    }
}
