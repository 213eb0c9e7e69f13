//! Parser configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How rows of the input map to transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionLayout {
    /// Decide from the first row.
    #[default]
    Auto,
    /// One basket per row; every cell holds one or more items.
    Basket,
    /// Header row, then one (transaction id, item) pair per row.
    Grouped,
}

impl FromStr for TransactionLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "basket" => Ok(Self::Basket),
            "grouped" => Ok(Self::Grouped),
            other => Err(format!("unknown layout '{other}' (expected auto, basket, grouped)")),
        }
    }
}

impl fmt::Display for TransactionLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Basket => "basket",
            Self::Grouped => "grouped",
        })
    }
}

/// Configuration for the CSV transaction parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParseConfig {
    /// Row layout. Default: auto.
    pub layout: Option<TransactionLayout>,
    /// Field delimiter, must be ASCII. Default: ','.
    pub delimiter: Option<char>,
    /// Separator for several items inside one basket cell. Default: ';'.
    pub item_separator: Option<char>,
    /// Whether the first row of a basket-layout file is a header. Default: false.
    pub has_headers: Option<bool>,
    /// Transaction id column for the grouped layout. Default: "transaction_id".
    pub transaction_column: Option<String>,
    /// Item column for the grouped layout. Default: "item".
    pub item_column: Option<String>,
}

impl ParseConfig {
    pub fn effective_layout(&self) -> TransactionLayout {
        self.layout.unwrap_or_default()
    }

    pub fn effective_delimiter(&self) -> char {
        self.delimiter.unwrap_or(',')
    }

    pub fn effective_item_separator(&self) -> char {
        self.item_separator.unwrap_or(';')
    }

    pub fn effective_has_headers(&self) -> bool {
        self.has_headers.unwrap_or(false)
    }

    pub fn effective_transaction_column(&self) -> &str {
        self.transaction_column.as_deref().unwrap_or("transaction_id")
    }

    pub fn effective_item_column(&self) -> &str {
        self.item_column.as_deref().unwrap_or("item")
    }

    /// Overlay every field that is set in `other`.
    pub fn merge(&mut self, other: &ParseConfig) {
        if other.layout.is_some() {
            self.layout = other.layout;
        }
        if other.delimiter.is_some() {
            self.delimiter = other.delimiter;
        }
        if other.item_separator.is_some() {
            self.item_separator = other.item_separator;
        }
        if other.has_headers.is_some() {
            self.has_headers = other.has_headers;
        }
        if other.transaction_column.is_some() {
            self.transaction_column = other.transaction_column.clone();
        }
        if other.item_column.is_some() {
            self.item_column = other.item_column.clone();
        }
    }
}
