//! Stable, machine-readable error codes.
//!
//! Codes are part of the external contract: the CLI prints them and callers
//! match on them, so they never change once published.

pub const PARSE_EMPTY_INPUT: &str = "PARSE_EMPTY_INPUT";
pub const PARSE_UNREADABLE: &str = "PARSE_UNREADABLE";
pub const PARSE_MISSING_COLUMN: &str = "PARSE_MISSING_COLUMN";
pub const PARSE_INVALID_OPTION: &str = "PARSE_INVALID_OPTION";
pub const PARSE_NO_TRANSACTIONS: &str = "PARSE_NO_TRANSACTIONS";

pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
pub const CANCELLED: &str = "CANCELLED";
pub const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const EXPORT_ERROR: &str = "EXPORT_ERROR";

/// Every error type in the workspace exposes a stable code.
pub trait BasketErrorCode {
    fn error_code(&self) -> &'static str;

    /// Render as `[CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}
