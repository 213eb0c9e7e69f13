//! Report export errors.

use super::error_code::{self, BasketErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV writer error: {message}")]
    Csv { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BasketErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        error_code::EXPORT_ERROR
    }
}
