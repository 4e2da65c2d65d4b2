//! JSON export: a pretty-printed array of objects whose keys are the
//! selected column keys, in selection order.

use evd_core::EvidenceItem;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::column::ColumnKey;
use crate::error::ExportError;

struct JsonRow<'a> {
    item: &'a EvidenceItem,
    columns: &'a [ColumnKey],
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(column.key(), &column.extract(self.item))?;
        }
        map.end()
    }
}

pub fn to_json(records: &[&EvidenceItem], columns: &[ColumnKey]) -> Result<String, ExportError> {
    let rows: Vec<JsonRow<'_>> = records
        .iter()
        .map(|item| JsonRow {
            item: *item,
            columns,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evd_core::{EvidenceId, EvidenceType, FileMetadata, Scope, Timestamp};

    fn item(seq: u64, ty: EvidenceType) -> EvidenceItem {
        EvidenceItem::new(
            EvidenceId::generate(2026, seq),
            ty,
            FileMetadata {
                name: format!("f{seq}"),
                mime_type: "application/octet-stream".to_string(),
                size_bytes: 1,
            },
            Scope::province("Hà Nội"),
            "officer",
            Timestamp::parse("2026-01-01T00:00:00Z").unwrap(),
        )
    }

    #[test]
    fn objects_have_exactly_selected_keys_in_order() {
        let a = item(1, EvidenceType::Photo);
        let b = item(2, EvidenceType::Video);
        let json = to_json(&[&a, &b], &[ColumnKey::EvidenceId, ColumnKey::Type]).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"evidenceId\": \"EVD-2026-000001\",\n    \"type\": \"PHOTO\"\n  },\n  {\n    \"evidenceId\": \"EVD-2026-000002\",\n    \"type\": \"VIDEO\"\n  }\n]"
        );
    }

    #[test]
    fn reverse_selection_reverses_key_order() {
        let a = item(1, EvidenceType::Photo);
        let json = to_json(&[&a], &[ColumnKey::Type, ColumnKey::EvidenceId]).unwrap();
        let type_at = json.find("\"type\"").unwrap();
        let id_at = json.find("\"evidenceId\"").unwrap();
        assert!(type_at < id_at);
    }

    #[test]
    fn unknown_column_renders_empty_string() {
        let a = item(1, EvidenceType::Photo);
        let json = to_json(&[&a], &[ColumnKey::parse("colour")]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["colour"], "");
    }

    #[test]
    fn no_records_is_empty_array() {
        assert_eq!(to_json(&[], &[ColumnKey::Type]).unwrap(), "[]");
    }
}
