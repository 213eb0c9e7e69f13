//! Report export.

pub mod csv_report;

pub use csv_report::{to_csv_report, write_csv_report};
