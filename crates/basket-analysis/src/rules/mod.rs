//! Association rule generation and ranking.

pub mod generator;
pub mod ranking;
pub mod types;

pub use generator::{RankedRules, RuleGenerator, MAX_RULE_ITEMSET_SIZE};
pub use ranking::{compare_rules, rank_rules, top_items, top_rules};
pub use types::AssociationRule;
