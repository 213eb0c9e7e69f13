//! Transaction parsing: raw delimited text → `TransactionSet`.

pub mod csv_parser;
pub mod types;

pub use csv_parser::TransactionParser;
pub use types::{ItemCatalog, ParseStats, Transaction, TransactionSet};
