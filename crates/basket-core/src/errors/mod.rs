//! Error types for every subsystem, one enum per concern.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;
pub mod export_error;
pub mod parse_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use export_error::ExportError;
pub use parse_error::ParseError;
