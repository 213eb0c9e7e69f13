//! The frequent itemset table produced by the miner.

use basket_core::FxHashMap;

use crate::index::Itemset;

/// One frequent itemset with its support.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    pub itemset: Itemset,
    pub support_count: usize,
    /// `support_count / total_transactions`.
    pub support: f64,
}

/// Every frequent itemset across all mined levels, plus the raw level-1
/// counts of every item (frequent or not) for the item frequency chart.
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsets {
    /// `levels[k - 1]` holds the frequent k-itemsets.
    levels: Vec<FxHashMap<Itemset, usize>>,
    item_counts: Vec<usize>,
    total_transactions: usize,
    len: usize,
}

impl FrequentItemsets {
    pub(crate) fn new(total_transactions: usize, item_counts: Vec<usize>) -> Self {
        Self {
            levels: Vec::new(),
            item_counts,
            total_transactions,
            len: 0,
        }
    }

    pub(crate) fn push_level(&mut self, level: FxHashMap<Itemset, usize>) {
        self.len += level.len();
        self.levels.push(level);
    }

    pub fn total_transactions(&self) -> usize {
        self.total_transactions
    }

    /// Raw occurrence count per `ItemId` index.
    pub fn item_counts(&self) -> &[usize] {
        &self.item_counts
    }

    /// Number of frequent itemsets across all levels.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the largest frequent itemset, 0 when none are frequent.
    pub fn max_level(&self) -> usize {
        self.levels.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1)
    }

    /// Support count of a frequent itemset; `None` when it is not frequent.
    pub fn support_count(&self, itemset: &Itemset) -> Option<usize> {
        let k = itemset.len();
        if k == 0 {
            return None;
        }
        self.levels.get(k - 1)?.get(itemset).copied()
    }

    pub fn support(&self, itemset: &Itemset) -> Option<f64> {
        self.support_count(itemset)
            .map(|count| count as f64 / self.total_transactions as f64)
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.support_count(itemset).is_some()
    }

    /// Number of frequent k-itemsets.
    pub fn level_len(&self, k: usize) -> usize {
        k.checked_sub(1)
            .and_then(|i| self.levels.get(i))
            .map_or(0, FxHashMap::len)
    }

    /// Frequent k-itemsets in canonical order.
    pub fn level(&self, k: usize) -> Vec<FrequentItemset> {
        let Some(level) = k.checked_sub(1).and_then(|i| self.levels.get(i)) else {
            return Vec::new();
        };
        let mut entries: Vec<FrequentItemset> = level
            .iter()
            .map(|(itemset, &count)| self.entry(itemset, count))
            .collect();
        entries.sort_unstable_by(|a, b| a.itemset.cmp(&b.itemset));
        entries
    }

    /// All frequent itemsets ordered by size, then canonically.
    pub fn iter(&self) -> impl Iterator<Item = FrequentItemset> + '_ {
        (1..=self.levels.len()).flat_map(move |k| self.level(k))
    }

    fn entry(&self, itemset: &Itemset, count: usize) -> FrequentItemset {
        FrequentItemset {
            itemset: itemset.clone(),
            support_count: count,
            support: count as f64 / self.total_transactions as f64,
        }
    }
}
