//! Mining thresholds and resource limits.

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// Configuration for the itemset miner and rule generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum support ratio, in (0, 1]. Default: 0.01.
    pub min_support: Option<f64>,
    /// Minimum rule confidence, in [0, 1]. Default: 0.7.
    pub min_confidence: Option<f64>,
    /// Number of rules and items kept in the result. Default: 10.
    pub top_n: Option<usize>,
    /// Largest itemset size to mine. Default: unbounded.
    pub max_itemset_size: Option<usize>,
    /// Safety cap on candidates per level and on total frequent itemsets.
    /// Default: 1_000_000.
    pub max_itemsets: Option<usize>,
    /// Safety cap on antecedent/consequent splits examined during rule
    /// generation. Default: 10_000_000.
    pub max_rules: Option<usize>,
    /// Counting threads. 0 = rayon's global pool. Default: 0.
    pub threads: Option<usize>,
    /// Transaction count below which counting stays sequential. Default: 1024.
    pub parallel_threshold: Option<usize>,
}

impl MiningConfig {
    pub const DEFAULT_MIN_SUPPORT: f64 = 0.01;
    pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;
    pub const DEFAULT_TOP_N: usize = 10;
    pub const DEFAULT_MAX_ITEMSETS: usize = 1_000_000;
    pub const DEFAULT_MAX_RULES: usize = 10_000_000;
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = Some(min_support);
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn with_max_itemset_size(mut self, max_itemset_size: usize) -> Self {
        self.max_itemset_size = Some(max_itemset_size);
        self
    }

    pub fn with_max_itemsets(mut self, max_itemsets: usize) -> Self {
        self.max_itemsets = Some(max_itemsets);
        self
    }

    pub fn with_max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = Some(max_rules);
        self
    }

    pub fn effective_min_support(&self) -> f64 {
        self.min_support.unwrap_or(Self::DEFAULT_MIN_SUPPORT)
    }

    pub fn effective_min_confidence(&self) -> f64 {
        self.min_confidence.unwrap_or(Self::DEFAULT_MIN_CONFIDENCE)
    }

    pub fn effective_top_n(&self) -> usize {
        self.top_n.unwrap_or(Self::DEFAULT_TOP_N)
    }

    pub fn effective_max_itemset_size(&self) -> Option<usize> {
        self.max_itemset_size
    }

    pub fn effective_max_itemsets(&self) -> usize {
        self.max_itemsets.unwrap_or(Self::DEFAULT_MAX_ITEMSETS)
    }

    pub fn effective_max_rules(&self) -> usize {
        self.max_rules.unwrap_or(Self::DEFAULT_MAX_RULES)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    pub fn effective_parallel_threshold(&self) -> usize {
        self.parallel_threshold
            .unwrap_or(Self::DEFAULT_PARALLEL_THRESHOLD)
    }

    /// Check every threshold against its valid range.
    ///
    /// NaN fails every range check.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let min_support = self.effective_min_support();
        if !(min_support > 0.0 && min_support <= 1.0) {
            return Err(AnalysisError::invalid_parameter(
                "min_support",
                min_support,
                "in (0, 1]",
            ));
        }

        let min_confidence = self.effective_min_confidence();
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(AnalysisError::invalid_parameter(
                "min_confidence",
                min_confidence,
                "in [0, 1]",
            ));
        }

        let top_n = self.effective_top_n();
        if top_n == 0 {
            return Err(AnalysisError::invalid_parameter("top_n", top_n, ">= 1"));
        }

        if let Some(max_size) = self.max_itemset_size {
            if max_size == 0 {
                return Err(AnalysisError::invalid_parameter(
                    "max_itemset_size",
                    max_size,
                    ">= 1",
                ));
            }
        }

        let max_itemsets = self.effective_max_itemsets();
        if max_itemsets == 0 {
            return Err(AnalysisError::invalid_parameter(
                "max_itemsets",
                max_itemsets,
                ">= 1",
            ));
        }

        let max_rules = self.effective_max_rules();
        if max_rules == 0 {
            return Err(AnalysisError::invalid_parameter("max_rules", max_rules, ">= 1"));
        }

        Ok(())
    }

    /// Overlay every field that is set in `other`.
    pub fn merge(&mut self, other: &MiningConfig) {
        if other.min_support.is_some() {
            self.min_support = other.min_support;
        }
        if other.min_confidence.is_some() {
            self.min_confidence = other.min_confidence;
        }
        if other.top_n.is_some() {
            self.top_n = other.top_n;
        }
        if other.max_itemset_size.is_some() {
            self.max_itemset_size = other.max_itemset_size;
        }
        if other.max_itemsets.is_some() {
            self.max_itemsets = other.max_itemsets;
        }
        if other.max_rules.is_some() {
            self.max_rules = other.max_rules;
        }
        if other.threads.is_some() {
            self.threads = other.threads;
        }
        if other.parallel_threshold.is_some() {
            self.parallel_threshold = other.parallel_threshold;
        }
    }
}
