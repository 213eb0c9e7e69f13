//! Canonically ordered itemsets.

use std::fmt;

use basket_core::ItemId;
use smallvec::SmallVec;

use crate::parser::types::ItemCatalog;

/// A set of items stored sorted by `ItemId`, so two itemsets with the same
/// members are equal, hash the same, and order the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset(SmallVec<[ItemId; 4]>);

impl Itemset {
    /// Build from ids in any order; duplicates are removed.
    pub fn new(ids: impl IntoIterator<Item = ItemId>) -> Self {
        let mut items: SmallVec<[ItemId; 4]> = ids.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn singleton(id: ItemId) -> Self {
        let mut items = SmallVec::new();
        items.push(id);
        Self(items)
    }

    /// Caller guarantees `items` is strictly increasing.
    pub(crate) fn from_sorted(items: SmallVec<[ItemId; 4]>) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self(items)
    }

    pub fn items(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All items but the last: the join key for candidate generation.
    pub fn prefix(&self) -> &[ItemId] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    pub fn last(&self) -> Option<ItemId> {
        self.0.last().copied()
    }

    /// Whether every item of `self` appears in `sorted`, which must be
    /// strictly increasing (a transaction's items).
    pub fn is_subset_of(&self, sorted: &[ItemId]) -> bool {
        if self.0.len() > sorted.len() {
            return false;
        }
        let mut haystack = sorted.iter();
        'needles: for needle in &self.0 {
            for candidate in haystack.by_ref() {
                match candidate.cmp(needle) {
                    std::cmp::Ordering::Less => continue,
                    std::cmp::Ordering::Equal => continue 'needles,
                    std::cmp::Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    /// Copy without the item at `index`.
    pub fn without(&self, index: usize) -> Itemset {
        let mut items = self.0.clone();
        items.remove(index);
        Self(items)
    }

    /// Extend a (k−1)-prefix-sharing itemset by one larger item.
    pub(crate) fn extended(&self, item: ItemId) -> Itemset {
        debug_assert!(self.last().map_or(true, |last| last < item));
        let mut items = self.0.clone();
        items.push(item);
        Self(items)
    }

    /// Split by bitmask: bit `i` set puts item `i` in the first half.
    pub fn split(&self, mask: u64) -> (Itemset, Itemset) {
        let mut selected = SmallVec::new();
        let mut rest = SmallVec::new();
        for (i, &item) in self.0.iter().enumerate() {
            if mask & (1 << i) != 0 {
                selected.push(item);
            } else {
                rest.push(item);
            }
        }
        (Self::from_sorted(selected), Self::from_sorted(rest))
    }

    pub fn names(&self, catalog: &ItemCatalog) -> Vec<String> {
        self.0.iter().map(|&id| catalog.name(id).to_string()).collect()
    }

    /// Names joined by `,` in canonical order.
    pub fn canonical_string(&self, catalog: &ItemCatalog) -> String {
        self.names(catalog).join(",")
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", item.0)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<ItemId> {
        raw.iter().map(|&i| ItemId(i)).collect()
    }

    #[test]
    fn construction_is_order_independent() {
        let a = Itemset::new(ids(&[3, 1, 2, 1]));
        let b = Itemset::new(ids(&[1, 2, 3]));
        assert_eq!(a, b);
        assert_eq!(a.items(), ids(&[1, 2, 3]).as_slice());
        assert_eq!(a.prefix(), ids(&[1, 2]).as_slice());
    }

    #[test]
    fn subset_check_walks_sorted_items() {
        let set = Itemset::new(ids(&[2, 5]));
        assert!(set.is_subset_of(&ids(&[1, 2, 3, 5])));
        assert!(!set.is_subset_of(&ids(&[1, 2, 3, 4])));
        assert!(!set.is_subset_of(&ids(&[5])));
        assert!(Itemset::new(ids(&[])).is_subset_of(&ids(&[1])));
    }

    #[test]
    fn split_partitions_by_mask() {
        let set = Itemset::new(ids(&[1, 4, 7]));
        let (a, b) = set.split(0b101);
        assert_eq!(a.items(), ids(&[1, 7]).as_slice());
        assert_eq!(b.items(), ids(&[4]).as_slice());
    }

    #[test]
    fn without_drops_one_item() {
        let set = Itemset::new(ids(&[1, 4, 7]));
        assert_eq!(set.without(1).items(), ids(&[1, 7]).as_slice());
    }
}
