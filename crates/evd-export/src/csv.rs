//! CSV rendering: a header row of column labels, then one row per record,
//! joined with `\n` and prefixed with a UTF-8 byte order mark so
//! spreadsheet tools detect the encoding.

use evd_core::EvidenceItem;

use crate::column::ColumnKey;

pub const UTF8_BOM: &str = "\u{feff}";

/// Quote a field containing a comma, quote, CR or LF, doubling inner quotes.
pub fn csv_escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_row<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields.map(csv_escape).collect::<Vec<_>>().join(",")
}

pub fn to_csv(records: &[&EvidenceItem], columns: &[ColumnKey]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(csv_row(columns.iter().map(ColumnKey::label)));
    for record in records {
        let values: Vec<String> = columns.iter().map(|c| c.extract(record)).collect();
        lines.push(csv_row(values.iter().map(String::as_str)));
    }
    format!("{UTF8_BOM}{}", lines.join("\n"))
}
