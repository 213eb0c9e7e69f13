//! Frequent itemset mining.

pub mod apriori;
pub mod candidates;
pub mod types;

pub use apriori::{meets_support, FrequentItemsetMiner};
pub use candidates::generate_candidates;
pub use types::{FrequentItemset, FrequentItemsets};
