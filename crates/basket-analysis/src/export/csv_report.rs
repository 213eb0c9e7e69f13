//! Two-section CSV report: ranked rules, then the most purchased items.
//!
//! ```text
//! Association Rules
//! Antecedents,Consequents,Lift,Confidence,Support
//! eggs,bread,1.333,1.000,0.500
//!
//! Top 3 Frequent Items
//! Item,Purchase Count
//! bread,3
//! ```

use std::io::Write;

use basket_core::ExportError;

use crate::engine::types::AnalysisResult;

/// Joins multi-item sides inside one cell.
pub const ITEM_JOINER: &str = "; ";

pub fn write_csv_report<W: Write>(result: &AnalysisResult, mut writer: W) -> Result<(), ExportError> {
    {
        let mut csv = section_writer(&mut writer);
        csv.write_record(["Association Rules"]).map_err(from_csv)?;
        csv.write_record(["Antecedents", "Consequents", "Lift", "Confidence", "Support"])
            .map_err(from_csv)?;
        for rule in &result.rules {
            csv.write_record([
                rule.antecedents.join(ITEM_JOINER),
                rule.consequents.join(ITEM_JOINER),
                format!("{:.3}", rule.lift),
                format!("{:.3}", rule.confidence),
                format!("{:.3}", rule.support),
            ])
            .map_err(from_csv)?;
        }
        csv.flush()?;
    }

    // A record with one empty field would be written as `""`.
    writer.write_all(b"\n")?;

    let mut csv = section_writer(&mut writer);
    csv.write_record([format!("Top {} Frequent Items", result.top_items.len())])
        .map_err(from_csv)?;
    csv.write_record(["Item", "Purchase Count"]).map_err(from_csv)?;
    for item in &result.top_items {
        csv.write_record([item.item.clone(), item.count.to_string()])
            .map_err(from_csv)?;
    }
    csv.flush()?;
    Ok(())
}

fn section_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().flexible(true).from_writer(writer)
}

/// Render the report into a string.
pub fn to_csv_report(result: &AnalysisResult) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv_report(result, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::Csv {
        message: e.to_string(),
    })
}

fn from_csv(err: csv::Error) -> ExportError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => ExportError::Io(e),
        _ => ExportError::Csv { message },
    }
}
