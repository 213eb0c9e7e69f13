//! Rule generation and ranking tests, run end to end through the engine.

use basket_analysis::engine::HIGH_CONFIDENCE_THRESHOLD;
use basket_analysis::{run_analysis, AnalysisEngine, AnalysisResult, AssociationRule, TransactionSet};
use basket_core::config::{MiningConfig, ParseConfig};

const GROCERY: &str = "milk,bread\nmilk,bread,eggs\nmilk\nbread,eggs\n";

// ─── Helpers ────────────────────────────────────────────────────────────────

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn labels(result: &AnalysisResult) -> Vec<String> {
    result
        .rules
        .iter()
        .map(|r| format!("{}=>{}", r.antecedent_key(), r.consequent_key()))
        .collect()
}

fn find<'a>(result: &'a AnalysisResult, antecedent: &str, consequent: &str) -> &'a AssociationRule {
    result
        .rules
        .iter()
        .find(|r| r.antecedent_key() == antecedent && r.consequent_key() == consequent)
        .unwrap_or_else(|| panic!("no rule {antecedent} => {consequent}"))
}

/// Eight disjoint pairs, each bought together twice, plus three lone `b0`
/// baskets: 19 transactions and exactly 15 rules at confidence 0.5.
fn paired_baskets() -> TransactionSet {
    let mut baskets: Vec<Vec<String>> = Vec::new();
    for p in 0..8 {
        for _ in 0..2 {
            baskets.push(vec![format!("a{p}"), format!("b{p}")]);
        }
    }
    for _ in 0..3 {
        baskets.push(vec!["b0".to_string()]);
    }
    TransactionSet::from_baskets(baskets)
}

fn engine(min_support: f64, min_confidence: f64, top_n: usize) -> AnalysisEngine {
    AnalysisEngine::with_configs(
        ParseConfig::default(),
        MiningConfig::default()
            .with_min_support(min_support)
            .with_min_confidence(min_confidence)
            .with_top_n(top_n),
    )
}

// ─── Grocery scenario ───────────────────────────────────────────────────────

#[test]
fn milk_and_bread_rules_have_expected_metrics() {
    let result = run_analysis(GROCERY, 0.5, 0.5).unwrap();

    let milk_bread = find(&result, "milk", "bread");
    assert_close(milk_bread.support, 0.5);
    assert_close(milk_bread.confidence, 2.0 / 3.0);
    assert_close(milk_bread.lift, 8.0 / 9.0);

    let bread_milk = find(&result, "bread", "milk");
    assert_close(bread_milk.confidence, 2.0 / 3.0);
    assert_eq!(bread_milk.lift, milk_bread.lift);
}

#[test]
fn grocery_rules_are_ranked_by_lift_then_confidence() {
    let result = run_analysis(GROCERY, 0.5, 0.5).unwrap();
    assert_eq!(
        labels(&result),
        vec!["eggs=>bread", "bread=>eggs", "bread=>milk", "milk=>bread"]
    );
    assert_close(result.rules[0].lift, 4.0 / 3.0);
    assert_close(result.rules[0].confidence, 1.0);
}

#[test]
fn no_frequent_itemsets_still_reports_top_items() {
    let result = run_analysis(GROCERY, 0.9, 0.5).unwrap();
    assert!(result.rules.is_empty());
    let items: Vec<(&str, usize)> = result
        .top_items
        .iter()
        .map(|i| (i.item.as_str(), i.count))
        .collect();
    // bread and milk tie on count; name order decides.
    assert_eq!(items, vec![("bread", 3), ("milk", 3), ("eggs", 2)]);
    assert_eq!(result.stats.frequent_itemsets, 0);
}

#[test]
fn confidence_threshold_is_inclusive() {
    let result = run_analysis(GROCERY, 0.5, 2.0 / 3.0).unwrap();
    assert_eq!(result.rules.len(), 4);
    let result = run_analysis(GROCERY, 0.5, 0.67).unwrap();
    assert_eq!(labels(&result), vec!["eggs=>bread"]);
}

// ─── Top-N ──────────────────────────────────────────────────────────────────

#[test]
fn fifteen_rules_truncate_to_top_ten() {
    let result = engine(0.1, 0.5, 10)
        .analyze_transactions(&paired_baskets())
        .unwrap();

    assert_eq!(result.stats.rules_generated, 15);
    assert_eq!(result.rules.len(), 10);
    let antecedents: Vec<String> = result.rules.iter().map(|r| r.antecedent_key()).collect();
    assert_eq!(
        antecedents,
        vec!["a1", "a2", "a3", "a4", "a5", "a6", "a7", "b1", "b2", "b3"]
    );
    assert!(result.rules.iter().all(|r| r.lift == 9.5 && r.confidence == 1.0));
}

#[test]
fn low_lift_rule_ranks_last() {
    let result = engine(0.1, 0.5, 50)
        .analyze_transactions(&paired_baskets())
        .unwrap();
    assert_eq!(result.rules.len(), 15);
    let last = result.rules.last().unwrap();
    assert_eq!(last.antecedent_key(), "a0");
    assert_close(last.lift, 3.8);
    // b0 => a0 has confidence 0.4 and never qualifies.
    assert!(!result.rules.iter().any(|r| r.antecedent_key() == "b0"));
}

#[test]
fn top_items_are_truncated_with_ties_by_name() {
    let result = engine(0.1, 0.5, 4)
        .analyze_transactions(&paired_baskets())
        .unwrap();
    let names: Vec<&str> = result.top_items.iter().map(|i| i.item.as_str()).collect();
    assert_eq!(names, vec!["b0", "a0", "a1", "a2"]);
    assert_eq!(result.top_items[0].count, 5);
}

// ─── Result views ───────────────────────────────────────────────────────────

#[test]
fn high_confidence_and_top_lift_views() {
    let result = run_analysis(GROCERY, 0.5, 0.5).unwrap();

    let strong = result.high_confidence_rules(HIGH_CONFIDENCE_THRESHOLD);
    assert_eq!(strong.len(), 1);
    assert_eq!(strong[0].antecedent_key(), "eggs");

    assert_eq!(result.top_by_lift(3).len(), 3);
    assert_eq!(result.top_by_lift(3)[0].antecedent_key(), "eggs");
    assert_eq!(result.top_by_lift(100).len(), 4);
}

#[test]
fn rules_serialize_with_dashboard_field_names() {
    let result = run_analysis(GROCERY, 0.5, 0.9).unwrap();
    let json: serde_json::Value = serde_json::from_str(&result.to_json(false).unwrap()).unwrap();
    let rule = &json["rules"][0];
    assert_eq!(rule["antecedents"], serde_json::json!(["eggs"]));
    assert_eq!(rule["consequents"], serde_json::json!(["bread"]));
    assert_eq!(rule["confidence"], serde_json::json!(1.0));
    assert!(rule.get("lift").is_some());
    assert!(rule.get("support").is_some());
    assert_eq!(json["top_items"][0]["item"], "bread");
}
