//! Itemset index: canonical itemsets and partitioned support counting.

pub mod counter;
pub mod itemset;

pub use counter::{CountingOptions, ItemsetIndex};
pub use itemset::Itemset;
