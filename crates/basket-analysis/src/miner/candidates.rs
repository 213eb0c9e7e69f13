//! Candidate generation: prefix join plus anti-monotone pruning.

use basket_core::FxHashSet;

use crate::index::Itemset;

/// Generate (k+1)-candidates from the frequent k-itemsets in `sorted`.
///
/// `sorted` must be in canonical order and all of size k. Two itemsets are
/// joined only when they share their first k−1 items; because the input is
/// sorted, each such group is contiguous and every candidate is produced once.
/// A candidate survives only if all of its k-subsets are frequent.
///
/// The output is in canonical order.
pub fn generate_candidates(sorted: &[Itemset]) -> Vec<Itemset> {
    debug_assert!(sorted.windows(2).all(|w| w[0] < w[1]));

    let members: FxHashSet<&Itemset> = sorted.iter().collect();
    let mut candidates = Vec::new();

    for (i, left) in sorted.iter().enumerate() {
        for right in &sorted[i + 1..] {
            if left.prefix() != right.prefix() {
                break;
            }
            let Some(last) = right.last() else {
                continue;
            };
            let candidate = left.extended(last);
            if has_infrequent_subset(&candidate, &members) {
                continue;
            }
            candidates.push(candidate);
        }
    }

    candidates
}

/// The two subsets that drop one of the last two items are the join parents
/// and known frequent; only the others need checking.
fn has_infrequent_subset(candidate: &Itemset, members: &FxHashSet<&Itemset>) -> bool {
    let parents_start = candidate.len().saturating_sub(2);
    (0..parents_start).any(|i| !members.contains(&candidate.without(i)))
}
