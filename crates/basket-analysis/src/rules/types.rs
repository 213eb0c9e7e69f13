//! Association rule type.

use serde::{Deserialize, Serialize};

use crate::index::Itemset;
use crate::parser::types::ItemCatalog;

/// `antecedents ⇒ consequents`, with item names in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedents: Vec<String>,
    pub consequents: Vec<String>,
    /// Support of antecedents ∪ consequents.
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

impl AssociationRule {
    /// Antecedent names joined by `,`.
    pub fn antecedent_key(&self) -> String {
        self.antecedents.join(",")
    }

    pub fn consequent_key(&self) -> String {
        self.consequents.join(",")
    }
}

/// A rule still held as item ids. Names are only resolved for the rules
/// that survive ranking.
#[derive(Debug, Clone)]
pub(crate) struct RuleCandidate {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

impl RuleCandidate {
    pub fn resolve(&self, catalog: &ItemCatalog) -> AssociationRule {
        AssociationRule {
            antecedents: self.antecedent.names(catalog),
            consequents: self.consequent.names(catalog),
            support: self.support,
            confidence: self.confidence,
            lift: self.lift,
        }
    }
}
