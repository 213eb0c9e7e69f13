//! CSV → transactions.
//!
//! Two row conventions are supported: one basket per row, or (transaction id,
//! item) pairs grouped by id. `Auto` picks one from the first row.

use std::io::Read;

use basket_core::config::{ParseConfig, TransactionLayout};
use basket_core::types::ItemInterner;
use basket_core::{FxHashMap, ParseError};
use csv::StringRecord;
use lasso::Spur;

use super::types::{ParseStats, TransactionSet};

/// Header fragments that identify a transaction id column.
pub const ID_COLUMN_HINTS: &[&str] = &["transaction", "order", "invoice", "basket", "receipt"];

/// Header fragments that identify an item column.
pub const ITEM_COLUMN_HINTS: &[&str] = &["item", "product", "description", "sku"];

/// Words that may follow an id hint in an `Auto`-detected header
/// (`order_id`, `InvoiceNo`, `receipt number`).
const ID_SUFFIXES: &[&str] = &["id", "no", "num", "number", "code", "key"];

/// Words that may follow an item hint in an `Auto`-detected header
/// (`item_name`, `itemDescription`, `products`).
const ITEM_SUFFIXES: &[&str] = &["s", "id", "name", "description", "desc", "code", "no"];

/// Stateless parser; one instance can parse any number of inputs.
#[derive(Debug, Clone, Default)]
pub struct TransactionParser {
    config: ParseConfig,
}

/// Accumulates rows while a single input is being read.
struct RowSink {
    interner: ItemInterner,
    rows: Vec<Vec<Spur>>,
    stats: ParseStats,
}

impl RowSink {
    fn new() -> Self {
        Self {
            interner: ItemInterner::new(),
            rows: Vec::new(),
            stats: ParseStats::default(),
        }
    }

    fn finish(self) -> Result<TransactionSet, ParseError> {
        if self.rows.is_empty() {
            return Err(ParseError::NoTransactions {
                rows_read: self.stats.rows_read,
                rows_skipped: self.stats.rows_skipped,
            });
        }
        if self.stats.rows_skipped > 0 {
            tracing::warn!(
                rows_skipped = self.stats.rows_skipped,
                rows_read = self.stats.rows_read,
                "skipped malformed rows"
            );
        }
        Ok(TransactionSet::from_interned(self.interner, self.rows, self.stats))
    }
}

impl TransactionParser {
    pub fn new(config: ParseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parse raw CSV text.
    pub fn parse_str(&self, input: &str) -> Result<TransactionSet, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }
        self.parse_reader(input.as_bytes())
    }

    /// Parse CSV from any byte source. I/O failures are fatal; undecodable
    /// rows are skipped.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<TransactionSet, ParseError> {
        let delimiter = self.delimiter_byte()?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut sink = RowSink::new();
        let mut records = csv_reader.records();

        let first = loop {
            match records.next() {
                None => {
                    return if sink.stats.rows_read == 0 {
                        Err(ParseError::EmptyInput)
                    } else {
                        sink.finish()
                    };
                }
                Some(Ok(record)) => break record,
                Some(Err(e)) => skip_or_fail(&mut sink.stats, e)?,
            }
        };

        let grouped_columns = match self.config.effective_layout() {
            TransactionLayout::Auto => self.detect_grouped_columns(&first),
            TransactionLayout::Grouped => Some(self.resolve_grouped_columns(&first)?),
            TransactionLayout::Basket => None,
        };
        tracing::debug!(grouped = grouped_columns.is_some(), "resolved transaction layout");

        match grouped_columns {
            Some((id_col, item_col)) => {
                let mut by_id: FxHashMap<String, usize> = FxHashMap::default();
                for result in records {
                    match result {
                        Ok(record) => {
                            sink.stats.rows_read += 1;
                            push_grouped_row(&mut sink, &mut by_id, &record, id_col, item_col);
                        }
                        Err(e) => skip_or_fail(&mut sink.stats, e)?,
                    }
                }
            }
            None => {
                let separator = self.config.effective_item_separator();
                if !self.config.effective_has_headers() {
                    sink.stats.rows_read += 1;
                    push_basket_row(&mut sink, &first, separator);
                }
                for result in records {
                    match result {
                        Ok(record) => {
                            sink.stats.rows_read += 1;
                            push_basket_row(&mut sink, &record, separator);
                        }
                        Err(e) => skip_or_fail(&mut sink.stats, e)?,
                    }
                }
            }
        }

        sink.finish()
    }

    fn delimiter_byte(&self) -> Result<u8, ParseError> {
        let delimiter = self.config.effective_delimiter();
        if !delimiter.is_ascii() {
            return Err(ParseError::InvalidOption {
                message: format!("delimiter '{delimiter}' must be a single ASCII character"),
            });
        }
        Ok(delimiter as u8)
    }

    /// `Auto` only treats the first row as a grouped header when it names
    /// both columns outright: the configured names, or a hint word standing
    /// alone or followed by an id-like suffix. Hints inside longer values
    /// ("fruit basket", "dairy product") are item names, not headers.
    fn detect_grouped_columns(&self, header: &StringRecord) -> Option<(usize, usize)> {
        let lowered: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        let id_name = self.config.effective_transaction_column().to_lowercase();
        let item_name = self.config.effective_item_column().to_lowercase();

        let id_col = lowered.iter().position(|h| *h == id_name).or_else(|| {
            lowered
                .iter()
                .position(|h| is_column_name(h, ID_COLUMN_HINTS, ID_SUFFIXES))
        })?;
        let item_col = lowered
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != id_col)
            .find(|(_, h)| **h == item_name)
            .or_else(|| {
                lowered
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != id_col)
                    .find(|(_, h)| is_column_name(h, ITEM_COLUMN_HINTS, ITEM_SUFFIXES))
            })
            .map(|(i, _)| i)?;

        Some((id_col, item_col))
    }

    /// Locate the id and item columns in a header row for an explicit
    /// grouped layout: the configured names first (case-insensitive), then
    /// any header containing a hint.
    fn resolve_grouped_columns(&self, header: &StringRecord) -> Result<(usize, usize), ParseError> {
        let lowered: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        let id_name = self.config.effective_transaction_column().to_lowercase();
        let item_name = self.config.effective_item_column().to_lowercase();

        let id_col = lowered
            .iter()
            .position(|h| *h == id_name)
            .or_else(|| find_by_hint(&lowered, ID_COLUMN_HINTS, None));
        let Some(id_col) = id_col else {
            return Err(missing_column(&id_name, header));
        };

        let item_col = lowered
            .iter()
            .position(|h| *h == item_name)
            .filter(|&i| i != id_col)
            .or_else(|| find_by_hint(&lowered, ITEM_COLUMN_HINTS, Some(id_col)));
        let Some(item_col) = item_col else {
            return Err(missing_column(&item_name, header));
        };

        Ok((id_col, item_col))
    }
}

fn find_by_hint(headers: &[String], hints: &[&str], exclude: Option<usize>) -> Option<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != exclude)
        .find(|(_, h)| hints.iter().any(|hint| h.contains(hint)))
        .map(|(i, _)| i)
}

/// `header` (lowercased) is a hint on its own, a hint glued to a suffix
/// (`invoiceno`), or a hint and a suffix as two words (`order_id`).
fn is_column_name(header: &str, hints: &[&str], suffixes: &[&str]) -> bool {
    let words: Vec<&str> = header
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    match words.as_slice() {
        [word] => hints.iter().any(|hint| {
            word.strip_prefix(*hint)
                .is_some_and(|rest| rest.is_empty() || suffixes.contains(&rest))
        }),
        [hint, suffix] => hints.contains(hint) && suffixes.contains(suffix),
        _ => false,
    }
}

fn missing_column(column: &str, header: &StringRecord) -> ParseError {
    ParseError::MissingColumn {
        column: column.to_string(),
        available: header.iter().collect::<Vec<_>>().join(", "),
    }
}

/// I/O errors abort the parse; anything else skips the row.
fn skip_or_fail(stats: &mut ParseStats, error: csv::Error) -> Result<(), ParseError> {
    if error.is_io_error() {
        return Err(ParseError::Unreadable {
            message: error.to_string(),
        });
    }
    stats.rows_read += 1;
    stats.rows_skipped += 1;
    tracing::debug!(
        line = error.position().map(|p| p.line()),
        error = %error,
        "skipping undecodable row"
    );
    Ok(())
}

fn push_basket_row(sink: &mut RowSink, record: &StringRecord, separator: char) {
    let keys: Vec<Spur> = record
        .iter()
        .flat_map(|cell| cell.split(separator))
        .filter_map(|raw| sink.interner.intern(raw))
        .collect();
    if keys.is_empty() {
        sink.stats.empty_rows += 1;
    } else {
        sink.rows.push(keys);
    }
}

fn push_grouped_row(
    sink: &mut RowSink,
    by_id: &mut FxHashMap<String, usize>,
    record: &StringRecord,
    id_col: usize,
    item_col: usize,
) {
    if record.iter().all(|cell| cell.trim().is_empty()) {
        sink.stats.empty_rows += 1;
        return;
    }

    let id = record.get(id_col).map(str::trim).unwrap_or_default();
    let item = match record.get(item_col) {
        // Only intern once the row is known to be usable.
        Some(raw) if !id.is_empty() => sink.interner.intern(raw),
        _ => None,
    };
    let item = match item {
        Some(item) => item,
        None => {
            sink.stats.rows_skipped += 1;
            tracing::debug!(
                line = record.position().map(|p| p.line()),
                "skipping row without transaction id or item"
            );
            return;
        }
    };

    let slot = match by_id.get(id) {
        Some(&slot) => slot,
        None => {
            let slot = sink.rows.len();
            by_id.insert(id.to_string(), slot);
            sink.rows.push(Vec::new());
            slot
        }
    };
    sink.rows[slot].push(item);
}
