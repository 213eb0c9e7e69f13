//! Transaction parser tests: both row layouts, normalization, and the
//! skip-versus-fail policy for malformed input.

use basket_analysis::parser::TransactionParser;
use basket_analysis::TransactionSet;
use basket_core::config::{ParseConfig, TransactionLayout};
use basket_core::{BasketErrorCode, ParseError};

// ─── Helpers ────────────────────────────────────────────────────────────────

fn parse(input: &str) -> Result<TransactionSet, ParseError> {
    TransactionParser::default().parse_str(input)
}

fn parse_with(config: ParseConfig, input: &str) -> Result<TransactionSet, ParseError> {
    TransactionParser::new(config).parse_str(input)
}

fn basket_names(set: &TransactionSet, index: usize) -> Vec<&str> {
    set.transactions()[index]
        .items()
        .iter()
        .map(|&id| set.catalog().name(id))
        .collect()
}

// ─── Basket layout ──────────────────────────────────────────────────────────

#[test]
fn basket_rows_are_normalized_and_split() {
    let set = parse("Milk, Bread\nmilk;bread;EGGS\n").unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.catalog().names(), &["bread", "eggs", "milk"]);
    assert_eq!(basket_names(&set, 0), vec!["bread", "milk"]);
    assert_eq!(basket_names(&set, 1), vec!["bread", "eggs", "milk"]);
}

#[test]
fn duplicate_items_in_a_basket_collapse() {
    let set = parse("milk,milk,bread,MILK\n").unwrap();
    assert_eq!(set.transactions()[0].len(), 2);
}

#[test]
fn quoted_fields_keep_embedded_delimiters() {
    let set = parse("\"milk, whole\",bread\n").unwrap();
    assert_eq!(basket_names(&set, 0), vec!["bread", "milk, whole"]);
}

#[test]
fn header_row_is_skipped_when_configured() {
    let config = ParseConfig {
        layout: Some(TransactionLayout::Basket),
        has_headers: Some(true),
        ..Default::default()
    };
    let set = parse_with(config, "items\nmilk;bread\n").unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.catalog().id_of("items").is_none());
}

#[test]
fn blank_rows_are_dropped_and_counted() {
    let set = parse("milk\n, ,\nbread;eggs\n").unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.stats().empty_rows, 1);
    assert_eq!(set.stats().rows_read, 3);
}

#[test]
fn undecodable_rows_are_skipped() {
    let input: &[u8] = b"milk\n\xff\xfe\nbread\n";
    let set = TransactionParser::default().parse_reader(input).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.stats().rows_skipped, 1);
}

#[test]
fn custom_delimiter_and_separator() {
    let config = ParseConfig {
        delimiter: Some('\t'),
        item_separator: Some('|'),
        ..Default::default()
    };
    let set = parse_with(config, "milk|bread\teggs\n").unwrap();
    assert_eq!(basket_names(&set, 0), vec!["bread", "eggs", "milk"]);
}

// ─── Grouped layout ─────────────────────────────────────────────────────────

#[test]
fn grouped_rows_collapse_by_transaction_id() {
    let set = parse("Transaction_ID,Item\n1,milk\n1,bread\n2,milk\n1,eggs\n").unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(basket_names(&set, 0), vec!["bread", "eggs", "milk"]);
    assert_eq!(basket_names(&set, 1), vec!["milk"]);
}

#[test]
fn grouped_columns_found_by_header_hints() {
    let input = "InvoiceNo,Description,Quantity\n536365,WHITE MUG,6\n536365,tea,1\n536366,tea,2\n";
    let set = parse(input).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.catalog().names(), &["tea", "white mug"]);
}

#[test]
fn grouped_rows_without_id_are_skipped() {
    let set = parse("order_id,product\n,milk\n1,bread\n2,\n").unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.stats().rows_skipped, 2);
    // Items from rejected rows never enter the catalog.
    assert_eq!(set.catalog().names(), &["bread"]);
}

#[test]
fn explicit_grouped_layout_requires_columns() {
    let config = ParseConfig {
        layout: Some(TransactionLayout::Grouped),
        ..Default::default()
    };
    let err = parse_with(config, "a,b\n1,2\n").unwrap_err();
    assert!(matches!(err, ParseError::MissingColumn { ref column, .. } if column == "transaction_id"));
    assert_eq!(err.error_code(), "PARSE_MISSING_COLUMN");
}

#[test]
fn configured_column_names_take_precedence() {
    let config = ParseConfig {
        layout: Some(TransactionLayout::Grouped),
        transaction_column: Some("ticket".into()),
        item_column: Some("sku_name".into()),
        ..Default::default()
    };
    let set = parse_with(config, "order,ticket,sku_name\nx,7,milk\ny,7,bread\n").unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(basket_names(&set, 0), vec!["bread", "milk"]);
}

// ─── Auto layout detection ──────────────────────────────────────────────────

#[test]
fn item_names_containing_header_words_stay_basket_rows() {
    let set = parse("fruit basket,dairy product\nmilk,bread\nmilk,bread\nfruit basket,eggs\n").unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(basket_names(&set, 0), vec!["dairy product", "fruit basket"]);
    assert_eq!(basket_names(&set, 1), vec!["bread", "milk"]);
    assert_eq!(basket_names(&set, 2), vec!["bread", "milk"]);
    assert_eq!(basket_names(&set, 3), vec!["eggs", "fruit basket"]);
}

#[test]
fn common_header_spellings_are_detected() {
    for header in ["Transaction,Item", "receipt number,product_name", "BasketID,SKU", "order-no,Items"] {
        let input = format!("{header}\n1,milk\n1,bread\n2,milk\n");
        let set = parse(&input).unwrap();
        assert_eq!(set.len(), 2, "{header}");
        assert_eq!(basket_names(&set, 0), vec!["bread", "milk"], "{header}");
    }
}

#[test]
fn hint_words_inside_longer_values_are_not_headers() {
    for row in ["skull mug,order book", "bordered plate,sku labels", "Receipt Printer Paper,item"] {
        let set = parse(&format!("{row}\ntea\n")).unwrap();
        assert_eq!(set.len(), 2, "{row}");
    }
}

// ─── Whole-input failures ───────────────────────────────────────────────────

#[test]
fn empty_input_is_rejected() {
    assert_eq!(parse("").unwrap_err(), ParseError::EmptyInput);
    assert_eq!(parse("  \n\t\n").unwrap_err(), ParseError::EmptyInput);
    assert_eq!(
        ParseError::EmptyInput.to_string(),
        "CSV content cannot be empty. Please upload a file."
    );
}

#[test]
fn input_with_only_blank_rows_has_no_transactions() {
    let err = parse(",\n ,\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::NoTransactions {
            rows_read: 2,
            rows_skipped: 0
        }
    );
}

#[test]
fn non_ascii_delimiter_is_invalid() {
    let config = ParseConfig {
        delimiter: Some('§'),
        ..Default::default()
    };
    let err = parse_with(config, "milk\n").unwrap_err();
    assert!(matches!(err, ParseError::InvalidOption { .. }));
}
