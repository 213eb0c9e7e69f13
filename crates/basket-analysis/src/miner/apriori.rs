//! Level-wise frequent itemset mining.

use basket_core::config::MiningConfig;
use basket_core::events::{LevelCompleteEvent, NoOpEventHandler};
use basket_core::{AnalysisError, CancellationToken, EngineState, FxHashMap, ItemId};

use super::candidates::generate_candidates;
use super::types::FrequentItemsets;
use crate::engine::state::StateMachine;
use crate::index::{CountingOptions, Itemset, ItemsetIndex};
use crate::parser::types::TransactionSet;

/// Whether `count` occurrences out of `total` reach `min_support`.
/// Equality counts as frequent.
pub fn meets_support(count: usize, total: usize, min_support: f64) -> bool {
    total > 0 && count as f64 / total as f64 >= min_support
}

/// Finds every itemset whose support reaches the configured minimum.
///
/// Level k+1 is only explored from the frequent itemsets of level k, and a
/// candidate is only counted if all of its k-subsets are frequent. Mining
/// stops at the first empty level or at `max_itemset_size`.
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsetMiner {
    config: MiningConfig,
}

impl FrequentItemsetMiner {
    pub fn new(config: MiningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Mine `set` without state reporting.
    pub fn mine(
        &self,
        set: &TransactionSet,
        cancel: &CancellationToken,
    ) -> Result<FrequentItemsets, AnalysisError> {
        let handler = NoOpEventHandler;
        let mut machine = StateMachine::new(&handler);
        self.mine_tracked(set, cancel, &mut machine)
    }

    /// Mine `set`, driving `machine` through `Counting(k)`/`Filtering(k)`
    /// and emitting a level event per level.
    pub fn mine_tracked(
        &self,
        set: &TransactionSet,
        cancel: &CancellationToken,
        machine: &mut StateMachine<'_>,
    ) -> Result<FrequentItemsets, AnalysisError> {
        self.config.validate()?;
        if set.is_empty() {
            return Err(AnalysisError::invalid_parameter(
                "transactions",
                0,
                "a non-empty transaction set",
            ));
        }

        let total = set.len();
        let min_support = self.config.effective_min_support();
        let max_size = self.config.effective_max_itemset_size();
        let max_itemsets = self.config.effective_max_itemsets();
        let index = ItemsetIndex::new(set, CountingOptions::from(&self.config));

        if cancel.is_cancelled() {
            return Err(AnalysisError::cancelled("counting(k=1)"));
        }

        machine.advance(EngineState::Counting { level: 1 });
        let item_counts = index.count_items(cancel)?;
        machine.advance(EngineState::Filtering { level: 1 });

        let mut current: Vec<Itemset> = Vec::new();
        let mut level: FxHashMap<Itemset, usize> = FxHashMap::default();
        for (&count, id) in item_counts.iter().zip((0..).map(ItemId)) {
            if meets_support(count, total, min_support) {
                let itemset = Itemset::singleton(id);
                current.push(itemset.clone());
                level.insert(itemset, count);
            }
        }
        self.level_complete(machine, 1, item_counts.len(), level.len());
        check_limit(1, level.len(), max_itemsets)?;

        let mut table = FrequentItemsets::new(total, item_counts);
        table.push_level(level);

        let mut k = 1;
        while !current.is_empty() {
            if max_size.is_some_and(|max| k >= max) {
                tracing::debug!(max_itemset_size = k, "itemset size cap reached");
                break;
            }

            let next = k + 1;
            if cancel.is_cancelled() {
                return Err(AnalysisError::cancelled(format!("counting(k={next})")));
            }

            let candidates = generate_candidates(&current);
            if candidates.is_empty() {
                break;
            }
            check_limit(next, table.len() + candidates.len(), max_itemsets)?;

            machine.advance(EngineState::Counting { level: next });
            let counts = index.count_candidates(&candidates, cancel)?;
            machine.advance(EngineState::Filtering { level: next });

            let candidate_count = candidates.len();
            let mut survivors = Vec::new();
            let mut level = FxHashMap::default();
            for (candidate, count) in candidates.into_iter().zip(counts) {
                if meets_support(count, total, min_support) {
                    survivors.push(candidate.clone());
                    level.insert(candidate, count);
                }
            }
            self.level_complete(machine, next, candidate_count, level.len());

            if level.is_empty() {
                break;
            }
            table.push_level(level);
            current = survivors;
            k = next;
        }

        tracing::debug!(
            frequent_itemsets = table.len(),
            max_level = table.max_level(),
            "mining complete"
        );
        Ok(table)
    }

    fn level_complete(
        &self,
        machine: &StateMachine<'_>,
        level: usize,
        candidates: usize,
        frequent: usize,
    ) {
        tracing::debug!(level, candidates, frequent, "level complete");
        machine.events().on_level_complete(&LevelCompleteEvent {
            level,
            candidates,
            frequent,
        });
    }
}

/// Guard against runaway candidate growth at low support thresholds.
fn check_limit(level: usize, count: usize, limit: usize) -> Result<(), AnalysisError> {
    if count > limit {
        tracing::warn!(level, count, limit, "itemset limit exceeded");
        return Err(AnalysisError::ResourceExhausted {
            level,
            count,
            limit,
        });
    }
    Ok(())
}
