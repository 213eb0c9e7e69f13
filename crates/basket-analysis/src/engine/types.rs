//! Result types returned by an analysis run.

use serde::{Deserialize, Serialize};

use crate::rules::types::AssociationRule;

/// Confidence above which a rule counts as "high confidence" in reports.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// One bar of the item frequency chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFrequency {
    pub item: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub transactions: usize,
    pub distinct_items: usize,
    /// Rows rejected for missing fields.
    pub rows_skipped: usize,
    pub empty_rows: usize,
    pub frequent_itemsets: usize,
    /// Rules passing min confidence, before top-N truncation.
    pub rules_generated: usize,
    /// Size of the largest frequent itemset.
    pub levels_mined: usize,
    pub duration_ms: u64,
}

/// Immutable outcome of a completed run. Rules are ranked by lift and
/// `top_items` by count; both are truncated to top-N.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub rules: Vec<AssociationRule>,
    pub top_items: Vec<ItemFrequency>,
    pub stats: AnalysisStats,
}

impl AnalysisResult {
    /// Rules with confidence ≥ `threshold`, in rank order.
    pub fn high_confidence_rules(&self, threshold: f64) -> Vec<&AssociationRule> {
        self.rules
            .iter()
            .filter(|rule| rule.confidence >= threshold)
            .collect()
    }

    /// The `n` highest-lift rules.
    pub fn top_by_lift(&self, n: usize) -> &[AssociationRule] {
        &self.rules[..n.min(self.rules.len())]
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
