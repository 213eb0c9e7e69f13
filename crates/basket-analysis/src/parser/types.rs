//! Parsed transaction data.

use basket_core::types::ItemInterner;
use basket_core::ItemId;
use lasso::Key;
use serde::Serialize;
use smallvec::SmallVec;

/// One basket: a sorted, duplicate-free, non-empty set of items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transaction {
    items: SmallVec<[ItemId; 8]>,
}

impl Transaction {
    /// Build from any ids; sorts and removes duplicates.
    /// Returns `None` when no items remain.
    pub fn new(ids: impl IntoIterator<Item = ItemId>) -> Option<Self> {
        let mut items: SmallVec<[ItemId; 8]> = ids.into_iter().collect();
        if items.is_empty() {
            return None;
        }
        items.sort_unstable();
        items.dedup();
        Some(Self { items })
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.binary_search(&item).is_ok()
    }
}

/// Item names indexed by `ItemId`, in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemCatalog {
    names: Vec<String>,
}

impl ItemCatalog {
    /// `names` must already be sorted and unique.
    pub(crate) fn from_sorted(names: Vec<String>) -> Self {
        debug_assert!(names.windows(2).all(|w| w[0] < w[1]));
        Self { names }
    }

    pub fn name(&self, id: ItemId) -> &str {
        &self.names[id.index()]
    }

    pub fn id_of(&self, name: &str) -> Option<ItemId> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
            .and_then(|index| ItemId::try_from(index).ok())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Row accounting for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Data rows seen (header excluded).
    pub rows_read: usize,
    /// Malformed rows that were skipped.
    pub rows_skipped: usize,
    /// Rows with no items after normalization.
    pub empty_rows: usize,
}

/// The parser's output: transactions plus the catalog their ids refer to.
#[derive(Debug, Clone, Default)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
    catalog: ItemCatalog,
    stats: ParseStats,
}

impl TransactionSet {
    pub(crate) fn new(transactions: Vec<Transaction>, catalog: ItemCatalog, stats: ParseStats) -> Self {
        Self {
            transactions,
            catalog,
            stats,
        }
    }

    /// Build from in-memory baskets of raw item names. Names are normalized
    /// exactly as the CSV parser does; baskets that end up empty are dropped.
    pub fn from_baskets<B, S>(baskets: B) -> Self
    where
        B: IntoIterator,
        B::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut interner = ItemInterner::new();
        let mut rows = Vec::new();
        let mut stats = ParseStats::default();

        for basket in baskets {
            stats.rows_read += 1;
            let keys: Vec<_> = basket
                .into_iter()
                .filter_map(|raw| interner.intern(raw.as_ref()))
                .collect();
            if keys.is_empty() {
                stats.empty_rows += 1;
            } else {
                rows.push(keys);
            }
        }

        Self::from_interned(interner, rows, stats)
    }

    /// Renumber interned rows into canonical ids.
    pub(crate) fn from_interned(
        interner: ItemInterner,
        rows: Vec<Vec<lasso::Spur>>,
        stats: ParseStats,
    ) -> Self {
        let (names, remap) = interner.into_canonical();
        let transactions = rows
            .into_iter()
            .filter_map(|keys| Transaction::new(keys.into_iter().map(|k| remap[k.into_usize()])))
            .collect();
        Self::new(transactions, ItemCatalog::from_sorted(names), stats)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
