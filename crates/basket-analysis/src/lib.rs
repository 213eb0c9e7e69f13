//! # basket-analysis
//!
//! Market-basket analysis engine: CSV transaction parser, level-wise itemset
//! index, frequent itemset miner, association rule generator, the engine
//! pipeline that ties them together, and CSV report export.

#![allow(clippy::module_inception)]

pub mod engine;
pub mod export;
pub mod index;
pub mod miner;
pub mod parser;
pub mod rules;

pub use engine::pipeline::{run_analysis, AnalysisEngine};
pub use engine::types::{AnalysisResult, AnalysisStats, ItemFrequency};
pub use parser::types::{ItemCatalog, ParseStats, Transaction, TransactionSet};
pub use rules::types::AssociationRule;
