//! Support counting over transaction partitions.
//!
//! Each worker owns a disjoint chunk of transactions and a private count
//! vector; partial vectors are merged by summation, so the merge order never
//! affects the result.

use basket_core::config::MiningConfig;
use basket_core::{AnalysisError, CancellationToken, FxHashMap, ItemId};
use rayon::prelude::*;
use smallvec::SmallVec;

use super::itemset::Itemset;
use crate::parser::types::{Transaction, TransactionSet};

/// Transactions per work unit. Cancellation is polled once per chunk.
pub const CHUNK_SIZE: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct CountingOptions {
    /// Below this many transactions counting stays on the calling thread.
    pub parallel_threshold: usize,
    /// Dedicated pool size; 0 uses rayon's global pool.
    pub threads: usize,
}

impl Default for CountingOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: MiningConfig::DEFAULT_PARALLEL_THRESHOLD,
            threads: 0,
        }
    }
}

impl From<&MiningConfig> for CountingOptions {
    fn from(config: &MiningConfig) -> Self {
        Self {
            parallel_threshold: config.effective_parallel_threshold(),
            threads: config.effective_threads(),
        }
    }
}

/// Counts support for single items and for candidate itemsets of one level.
pub struct ItemsetIndex<'a> {
    transactions: &'a [Transaction],
    item_count: usize,
    options: CountingOptions,
    pool: Option<rayon::ThreadPool>,
}

impl<'a> ItemsetIndex<'a> {
    pub fn new(set: &'a TransactionSet, options: CountingOptions) -> Self {
        let pool = if options.threads > 0 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(options.threads)
                .build()
            {
                Ok(pool) => Some(pool),
                Err(e) => {
                    tracing::warn!(error = %e, threads = options.threads, "falling back to global rayon pool");
                    None
                }
            }
        } else {
            None
        };

        Self {
            transactions: set.transactions(),
            item_count: set.catalog().len(),
            options,
            pool,
        }
    }

    pub fn total_transactions(&self) -> usize {
        self.transactions.len()
    }

    /// Level-1 scan: raw occurrence count per `ItemId` index.
    pub fn count_items(&self, cancel: &CancellationToken) -> Result<Vec<usize>, AnalysisError> {
        self.partitioned(self.item_count, cancel, "counting(k=1)", |chunk, counts| {
            for tx in chunk {
                for &item in tx.items() {
                    counts[item.index()] += 1;
                }
            }
        })
    }

    /// Support count for each candidate, in candidate order. All candidates
    /// must have the same size.
    pub fn count_candidates(
        &self,
        candidates: &[Itemset],
        cancel: &CancellationToken,
    ) -> Result<Vec<usize>, AnalysisError> {
        let Some(first) = candidates.first() else {
            return Ok(Vec::new());
        };
        let k = first.len();
        let stage = format!("counting(k={k})");
        let slots: FxHashMap<&[ItemId], usize> = candidates
            .iter()
            .enumerate()
            .map(|(slot, candidate)| (candidate.items(), slot))
            .collect();

        self.partitioned(candidates.len(), cancel, &stage, |chunk, counts| {
            for tx in chunk.iter().filter(|tx| tx.len() >= k) {
                // Probe the transaction's own k-subsets when there are fewer
                // of them than candidates; otherwise test each candidate.
                if binomial(tx.len(), k) <= candidates.len() {
                    for_each_subset(tx.items(), k, |subset| {
                        if let Some(&slot) = slots.get(subset) {
                            counts[slot] += 1;
                        }
                    });
                } else {
                    for (slot, candidate) in counts.iter_mut().zip(candidates) {
                        if candidate.is_subset_of(tx.items()) {
                            *slot += 1;
                        }
                    }
                }
            }
        })
    }

    fn partitioned<F>(
        &self,
        width: usize,
        cancel: &CancellationToken,
        stage: &str,
        count_chunk: F,
    ) -> Result<Vec<usize>, AnalysisError>
    where
        F: Fn(&[Transaction], &mut [usize]) + Sync,
    {
        let transactions = self.transactions;
        let sequential = transactions.len() < self.options.parallel_threshold;

        let run = || -> Option<Vec<usize>> {
            if sequential {
                let mut counts = vec![0usize; width];
                for chunk in transactions.chunks(CHUNK_SIZE) {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    count_chunk(chunk, &mut counts);
                }
                Some(counts)
            } else {
                transactions
                    .par_chunks(CHUNK_SIZE)
                    .map(|chunk| {
                        if cancel.is_cancelled() {
                            return None;
                        }
                        let mut counts = vec![0usize; width];
                        count_chunk(chunk, &mut counts);
                        Some(counts)
                    })
                    .try_reduce(
                        || vec![0usize; width],
                        |mut acc, partial| {
                            for (total, n) in acc.iter_mut().zip(partial) {
                                *total += n;
                            }
                            Some(acc)
                        },
                    )
            }
        };

        let counts = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        match counts {
            Some(counts) if !cancel.is_cancelled() => Ok(counts),
            _ => Err(AnalysisError::cancelled(stage)),
        }
    }
}

/// C(n, k), saturating at `usize::MAX`.
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: usize = 1;
    for i in 0..k {
        // acc·(n−i) is C(n, i+1)·(i+1), so the division is exact.
        acc = match acc.checked_mul(n - i) {
            Some(product) => product / (i + 1),
            None => return usize::MAX,
        };
    }
    acc
}

/// Visit every k-subset of `items` in lexicographic index order. Subsets of
/// a sorted slice come out sorted.
fn for_each_subset<F>(items: &[ItemId], k: usize, mut visit: F)
where
    F: FnMut(&[ItemId]),
{
    let n = items.len();
    if k == 0 || k > n {
        return;
    }
    let mut picks: SmallVec<[usize; 8]> = (0..k).collect();
    let mut subset: SmallVec<[ItemId; 8]> = picks.iter().map(|&i| items[i]).collect();

    loop {
        visit(&subset);

        // Rightmost pick that can still move right.
        let mut i = k;
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            if picks[i] != i + n - k {
                break;
            }
        }
        picks[i] += 1;
        for j in i + 1..k {
            picks[j] = picks[j - 1] + 1;
        }
        for j in i..k {
            subset[j] = items[picks[j]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransactionSet {
        TransactionSet::from_baskets(vec![
            vec!["milk", "bread"],
            vec!["milk", "bread", "eggs"],
            vec!["milk"],
            vec!["bread", "eggs"],
        ])
    }

    #[test]
    fn item_counts_match_occurrences() {
        let set = sample();
        let index = ItemsetIndex::new(&set, CountingOptions::default());
        let counts = index.count_items(&CancellationToken::new()).unwrap();
        let catalog = set.catalog();
        assert_eq!(counts[catalog.id_of("milk").unwrap().index()], 3);
        assert_eq!(counts[catalog.id_of("bread").unwrap().index()], 3);
        assert_eq!(counts[catalog.id_of("eggs").unwrap().index()], 2);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let baskets: Vec<Vec<String>> = (0..3000)
            .map(|i| (0..(i % 5 + 1)).map(|j| format!("item{}", (i + j) % 7)).collect())
            .collect();
        let set = TransactionSet::from_baskets(baskets);
        let candidates: Vec<Itemset> = (0..6)
            .map(|i| Itemset::new([ItemId(i), ItemId(i + 1)]))
            .collect();
        let cancel = CancellationToken::new();

        let sequential = ItemsetIndex::new(
            &set,
            CountingOptions {
                parallel_threshold: usize::MAX,
                threads: 0,
            },
        );
        let parallel = ItemsetIndex::new(
            &set,
            CountingOptions {
                parallel_threshold: 1,
                threads: 2,
            },
        );

        assert_eq!(
            sequential.count_candidates(&candidates, &cancel).unwrap(),
            parallel.count_candidates(&candidates, &cancel).unwrap()
        );
        assert_eq!(
            sequential.count_items(&cancel).unwrap(),
            parallel.count_items(&cancel).unwrap()
        );
    }

    #[test]
    fn subsets_are_enumerated_in_order() {
        let items: Vec<ItemId> = (1..=4).map(ItemId).collect();
        let mut seen = Vec::new();
        for_each_subset(&items, 2, |subset| {
            seen.push(subset.iter().map(|id| id.0).collect::<Vec<_>>())
        });
        assert_eq!(
            seen,
            vec![vec![1, 2], vec![1, 3], vec![1, 4], vec![2, 3], vec![2, 4], vec![3, 4]]
        );
        assert_eq!(seen.len(), binomial(4, 2));
    }

    #[test]
    fn binomial_saturates() {
        assert_eq!(binomial(6, 3), 20);
        assert_eq!(binomial(3, 5), 0);
        assert_eq!(binomial(200, 100), usize::MAX);
    }

    #[test]
    fn subset_probing_matches_candidate_scan() {
        // Wide baskets with a full candidate level take the subset path; a
        // single candidate takes the scan path. Both must agree with a
        // direct subset check.
        let baskets: Vec<Vec<String>> = (0..50)
            .map(|i| (0..(i % 7 + 2)).map(|j| format!("i{}", (i * 3 + j) % 9)).collect())
            .collect();
        let set = TransactionSet::from_baskets(baskets);
        let n = set.catalog().len() as u32;
        let all_pairs: Vec<Itemset> = (0..n)
            .flat_map(|a| ((a + 1)..n).map(move |b| Itemset::new([ItemId(a), ItemId(b)])))
            .collect();
        let index = ItemsetIndex::new(&set, CountingOptions::default());
        let cancel = CancellationToken::new();

        let expected = |candidate: &Itemset| {
            set.transactions()
                .iter()
                .filter(|tx| candidate.is_subset_of(tx.items()))
                .count()
        };

        let counts = index.count_candidates(&all_pairs, &cancel).unwrap();
        for (candidate, count) in all_pairs.iter().zip(&counts) {
            assert_eq!(*count, expected(candidate), "{candidate}");
        }

        let single = &all_pairs[..1];
        assert_eq!(
            index.count_candidates(single, &cancel).unwrap(),
            vec![expected(&single[0])]
        );
    }

    #[test]
    fn cancelled_token_aborts_counting() {
        let set = sample();
        let index = ItemsetIndex::new(&set, CountingOptions::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = index.count_items(&cancel).unwrap_err();
        assert!(matches!(err, AnalysisError::Cancelled { .. }));
    }
}
