//! Deterministic ordering of rules and items.

use std::cmp::Ordering;

use basket_core::ItemId;

use super::types::{AssociationRule, RuleCandidate};
use crate::engine::types::ItemFrequency;
use crate::index::Itemset;
use crate::parser::types::ItemCatalog;

/// Sort by lift desc, confidence desc, then antecedent and consequent
/// canonical strings asc.
pub fn rank_rules(rules: &mut [AssociationRule]) {
    rules.sort_by(compare_rules);
}

/// Rank and keep the first `top_n`.
pub fn top_rules(mut rules: Vec<AssociationRule>, top_n: usize) -> Vec<AssociationRule> {
    rank_rules(&mut rules);
    rules.truncate(top_n);
    rules
}

pub fn compare_rules(a: &AssociationRule, b: &AssociationRule) -> Ordering {
    compare_metrics(a.lift, a.confidence, b.lift, b.confidence)
        .then_with(|| cmp_joined(string_names(&a.antecedents), string_names(&b.antecedents)))
        .then_with(|| cmp_joined(string_names(&a.consequents), string_names(&b.consequents)))
}

/// [`compare_rules`] for rules whose names are not resolved yet.
pub(crate) fn compare_candidates(
    a: &RuleCandidate,
    b: &RuleCandidate,
    catalog: &ItemCatalog,
) -> Ordering {
    compare_metrics(a.lift, a.confidence, b.lift, b.confidence)
        .then_with(|| {
            cmp_joined(
                itemset_names(&a.antecedent, catalog),
                itemset_names(&b.antecedent, catalog),
            )
        })
        .then_with(|| {
            cmp_joined(
                itemset_names(&a.consequent, catalog),
                itemset_names(&b.consequent, catalog),
            )
        })
}

fn compare_metrics(lift_a: f64, confidence_a: f64, lift_b: f64, confidence_b: f64) -> Ordering {
    lift_b
        .total_cmp(&lift_a)
        .then_with(|| confidence_b.total_cmp(&confidence_a))
}

fn string_names(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(String::as_str)
}

fn itemset_names<'a>(itemset: &'a Itemset, catalog: &'a ItemCatalog) -> impl Iterator<Item = &'a str> {
    itemset.items().iter().map(move |&id| catalog.name(id))
}

/// Compare the `,`-joined names of two sides without allocating.
fn cmp_joined<'a, 'b, A, B>(a: A, b: B) -> Ordering
where
    A: Iterator<Item = &'a str> + 'a,
    B: Iterator<Item = &'b str> + 'b,
{
    joined_bytes(a).cmp(joined_bytes(b))
}

fn joined_bytes<'a, I>(names: I) -> impl Iterator<Item = u8> + 'a
where
    I: Iterator<Item = &'a str> + 'a,
{
    names.enumerate().flat_map(|(i, name)| {
        let separator: &'static [u8] = if i == 0 { b"" } else { b"," };
        separator.iter().chain(name.as_bytes()).copied()
    })
}

/// The `top_n` most purchased items by raw count; ties go to the
/// alphabetically first name.
pub fn top_items(item_counts: &[usize], catalog: &ItemCatalog, top_n: usize) -> Vec<ItemFrequency> {
    let mut ranked: Vec<(ItemId, usize)> = (0..)
        .map(ItemId)
        .zip(item_counts.iter().copied())
        .filter(|&(_, count)| count > 0)
        .collect();
    // ItemId order is name order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(id, count)| ItemFrequency {
            item: catalog.name(id).to_string(),
            count,
        })
        .collect()
}
