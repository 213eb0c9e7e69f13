//! Rule generation from the frequent itemset table.

use basket_core::config::MiningConfig;
use basket_core::{AnalysisError, CancellationToken};

use super::ranking::compare_candidates;
use super::types::{AssociationRule, RuleCandidate};
use crate::miner::types::FrequentItemsets;
use crate::parser::types::ItemCatalog;

/// Splits are enumerated as bitmasks over a `u64`.
pub const MAX_RULE_ITEMSET_SIZE: usize = 63;

/// Candidates kept between compactions in [`RuleGenerator::generate_top`]
/// never drop below this, so small `top_n` values don't compact constantly.
const MIN_RETAINED: usize = 64;

/// The best rules of one run, plus how many passed min confidence before
/// truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRules {
    pub rules: Vec<AssociationRule>,
    pub generated: usize,
}

/// Builds every rule whose confidence reaches the minimum.
#[derive(Debug, Clone, Copy)]
pub struct RuleGenerator {
    min_confidence: f64,
    max_rules: usize,
}

impl RuleGenerator {
    pub fn new(min_confidence: f64) -> Self {
        Self {
            min_confidence,
            max_rules: MiningConfig::DEFAULT_MAX_RULES,
        }
    }

    pub fn from_config(config: &MiningConfig) -> Self {
        Self::new(config.effective_min_confidence()).with_max_rules(config.effective_max_rules())
    }

    pub fn with_max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = max_rules;
        self
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn max_rules(&self) -> usize {
        self.max_rules
    }

    /// Every rule over every frequent itemset of size ≥ 2, unranked, in
    /// itemset then mask order.
    pub fn generate(
        &self,
        table: &FrequentItemsets,
        catalog: &ItemCatalog,
        cancel: &CancellationToken,
    ) -> Result<Vec<AssociationRule>, AnalysisError> {
        let mut rules = Vec::new();
        self.enumerate(table, cancel, |candidate| rules.push(candidate.resolve(catalog)))?;
        Ok(rules)
    }

    /// The `top_n` best rules in rank order. At most `max(2 * top_n, 64)`
    /// candidates are alive at once, and only the survivors get names.
    pub fn generate_top(
        &self,
        table: &FrequentItemsets,
        catalog: &ItemCatalog,
        top_n: usize,
        cancel: &CancellationToken,
    ) -> Result<RankedRules, AnalysisError> {
        let cmp = |a: &RuleCandidate, b: &RuleCandidate| compare_candidates(a, b, catalog);
        let high_water = top_n.saturating_mul(2).max(MIN_RETAINED);

        let mut kept: Vec<RuleCandidate> = Vec::new();
        let generated = self.enumerate(table, cancel, |candidate| {
            kept.push(candidate);
            if kept.len() >= high_water {
                kept.select_nth_unstable_by(top_n, cmp);
                kept.truncate(top_n);
            }
        })?;

        kept.sort_by(cmp);
        kept.truncate(top_n);
        Ok(RankedRules {
            rules: kept.iter().map(|c| c.resolve(catalog)).collect(),
            generated,
        })
    }

    /// Feed every rule passing min confidence to `emit`; returns how many
    /// were emitted.
    fn enumerate<F>(
        &self,
        table: &FrequentItemsets,
        cancel: &CancellationToken,
        mut emit: F,
    ) -> Result<usize, AnalysisError>
    where
        F: FnMut(RuleCandidate),
    {
        self.check_budget(table)?;

        let total = table.total_transactions() as f64;
        let mut generated = 0;

        for frequent in table.iter().filter(|f| f.itemset.len() >= 2) {
            if cancel.is_cancelled() {
                return Err(AnalysisError::cancelled("rule_generation"));
            }

            let union_count = frequent.support_count as f64;
            let full = (1u64 << frequent.itemset.len()) - 1;
            for mask in 1..full {
                let (antecedent, consequent) = frequent.itemset.split(mask);
                // Subsets of a frequent itemset are always frequent.
                let (Some(ca), Some(cb)) = (
                    table.support_count(&antecedent),
                    table.support_count(&consequent),
                ) else {
                    tracing::warn!(itemset = %frequent.itemset, mask, "subset missing from frequent table");
                    continue;
                };

                let confidence = union_count / ca as f64;
                if confidence < self.min_confidence {
                    continue;
                }

                generated += 1;
                emit(RuleCandidate {
                    antecedent,
                    consequent,
                    support: frequent.support,
                    confidence,
                    lift: union_count * total / (ca as f64 * cb as f64),
                });
            }
        }

        tracing::debug!(rules = generated, min_confidence = self.min_confidence, "rules generated");
        Ok(generated)
    }

    /// A k-itemset has 2^k − 2 splits, so rule work grows much faster than
    /// the itemset table. Reject the table up front when the total split
    /// count passes `max_rules`.
    fn check_budget(&self, table: &FrequentItemsets) -> Result<(), AnalysisError> {
        let limit = self.max_rules as u64;
        let mut splits: u64 = 0;

        for k in 2..=table.max_level() {
            let itemsets = table.level_len(k);
            if k > MAX_RULE_ITEMSET_SIZE {
                return Err(AnalysisError::ResourceExhausted {
                    level: k,
                    count: itemsets,
                    limit: MAX_RULE_ITEMSET_SIZE,
                });
            }

            let per_itemset = (1u64 << k) - 2;
            let total = per_itemset
                .checked_mul(itemsets as u64)
                .and_then(|level| splits.checked_add(level))
                .unwrap_or(u64::MAX);
            if total > limit {
                tracing::warn!(level = k, splits = total, limit, "rule split limit exceeded");
                return Err(AnalysisError::ResourceExhausted {
                    level: k,
                    count: usize::try_from(total).unwrap_or(usize::MAX),
                    limit: self.max_rules,
                });
            }
            splits = total;
        }
        Ok(())
    }
}
