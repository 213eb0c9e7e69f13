//! Event payloads.

use serde::Serialize;

use crate::types::state::EngineState;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStartedEvent {
    pub min_support: f64,
    pub min_confidence: f64,
    pub top_n: usize,
    /// Input size in bytes, when the input is raw text.
    pub input_bytes: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateChangedEvent {
    pub from: EngineState,
    pub to: EngineState,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseCompleteEvent {
    pub transactions: usize,
    pub distinct_items: usize,
    pub rows_skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelCompleteEvent {
    /// Itemset size of this level.
    pub level: usize,
    pub candidates: usize,
    pub frequent: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisCompleteEvent {
    pub frequent_itemsets: usize,
    pub rules: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisErrorEvent {
    pub code: &'static str,
    pub message: String,
}
