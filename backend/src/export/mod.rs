//! Display and export boundary.
//!
//! Everything here consumes canonical records; nothing feeds back into the
//! core. `clean_value` runs on every display cell.
//!
//! Delimited output uses the canonical header order followed by extension
//! columns. With an `RDQuota` column it can be fed straight back into
//! [`crate::transform::transform`], which then runs in canonical-input mode.
//! The parser splits lines without honouring quotes, so fields are written
//! unquoted and a value holding the delimiter or a line break is refused.

use serde_json::{Map, Value};

use crate::config::RD_QUOTA_COLUMN;
use crate::error::CsvError;
use crate::models::CanonicalRecord;
use crate::transform::cleaners::clean_value;
use crate::transform::columns::{CANONICAL_HEADERS, ORIGINAL_ID_HEADER};

/// Options for delimited output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Append the `Original ID` metadata column
    pub include_original_id: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            include_original_id: false,
        }
    }
}

/// Copy records with an `RDQuota` display column derived from the original id.
pub fn with_rd_quota_column(records: &[CanonicalRecord]) -> Vec<CanonicalRecord> {
    records
        .iter()
        .map(|r| r.with_extension(RD_QUOTA_COLUMN, r.original_id.clone()))
        .collect()
}

/// Column order for a set of records: canonical headers, optional
/// `Original ID`, then extension columns by first appearance.
pub fn export_columns(records: &[CanonicalRecord], include_original_id: bool) -> Vec<String> {
    let mut columns: Vec<String> = CANONICAL_HEADERS.iter().map(|h| h.to_string()).collect();
    if include_original_id {
        columns.push(ORIGINAL_ID_HEADER.to_string());
    }

    for record in records {
        for key in record.extensions.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    columns
}

/// Records as display rows keyed by column name, every cell cleaned.
pub fn to_display_rows(records: &[CanonicalRecord], include_original_id: bool) -> Vec<Map<String, Value>> {
    let columns = export_columns(records, include_original_id);

    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|col| {
                    let raw = record
                        .field(col)
                        .map(|v| Value::String(v.to_string()))
                        .unwrap_or(Value::Null);
                    (col.clone(), clean_value(&raw))
                })
                .collect()
        })
        .collect()
}

/// Serialize records as delimited text with a header line.
pub fn to_delimited(records: &[CanonicalRecord], options: &ExportOptions) -> Result<String, CsvError> {
    let columns = export_columns(records, options.include_original_id);
    let rows = to_display_rows(records, options.include_original_id);

    let delimiter = char::from(options.delimiter);
    for row in &rows {
        for (column, value) in row {
            let text = value.as_str().unwrap_or("");
            if text.contains(delimiter) || text.contains(['\n', '\r']) {
                return Err(CsvError::UnrepresentableValue {
                    column: column.clone(),
                    value: text.to_string(),
                });
            }
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    writer
        .write_record(&columns)
        .map_err(|e| CsvError::WriteError(e.to_string()))?;

    for row in &rows {
        let cells: Vec<&str> = columns
            .iter()
            .map(|col| row.get(col).and_then(|v| v.as_str()).unwrap_or(""))
            .collect();
        writer
            .write_record(&cells)
            .map_err(|e| CsvError::WriteError(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::WriteError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvError::EncodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RequestTypeCode, NOT_APPLICABLE};
    use std::collections::BTreeMap;

    fn record(id: &str) -> CanonicalRecord {
        CanonicalRecord {
            subscription_id: " sub-1 ".into(),
            request_type_label: "Zonal Enablement".into(),
            vm_type: "Standard_D2s_v3".into(),
            region: "East US".into(),
            zone: "2".into(),
            cores: NOT_APPLICABLE.into(),
            status: "Approved".into(),
            original_id: id.into(),
            request_type_code: RequestTypeCode::ZonalEnablement,
            extensions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_rd_quota_column_added_without_touching_input() {
        let records = vec![record("314")];
        let extended = with_rd_quota_column(&records);

        assert!(records[0].extensions.is_empty());
        assert_eq!(extended[0].extensions.get("RDQuota").map(String::as_str), Some("314"));
    }

    #[test]
    fn test_export_columns_order() {
        let records = with_rd_quota_column(&[record("1")]);
        let columns = export_columns(&records, true);

        assert_eq!(columns[0], "Subscription ID");
        assert_eq!(columns[6], "Status");
        assert_eq!(columns[7], "Original ID");
        assert_eq!(columns[8], "RDQuota");
    }

    #[test]
    fn test_display_rows_are_cleaned() {
        let rows = to_display_rows(&[record("1")], false);
        assert_eq!(rows[0]["Subscription ID"], "sub-1");
        assert_eq!(rows[0]["Cores"], "N/A");
        assert!(rows[0].get("Original ID").is_none());
    }

    #[test]
    fn test_extension_missing_on_some_records_reads_empty() {
        let records = vec![record("1").with_extension("Note", "rush"), record("2")];
        let rows = to_display_rows(&records, false);
        assert_eq!(rows[0]["Note"], "rush");
        assert_eq!(rows[1]["Note"], "");
    }

    #[test]
    fn test_to_delimited_tab() {
        let text = to_delimited(&with_rd_quota_column(&[record("9")]), &ExportOptions::default()).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("Subscription ID\tRequest Type\tVM Type\tRegion\tZone\tCores\tStatus\tRDQuota")
        );
        assert_eq!(
            lines.next(),
            Some("sub-1\tZonal Enablement\tStandard_D2s_v3\tEast US\t2\tN/A\tApproved\t9")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_to_delimited_refuses_delimiter_in_value() {
        let mut zonal = record("3");
        zonal.zone = "1,2".into();
        let options = ExportOptions {
            delimiter: b',',
            include_original_id: false,
        };

        let err = to_delimited(&[zonal], &options).unwrap_err();
        assert!(matches!(
            err,
            CsvError::UnrepresentableValue { ref column, ref value } if column == "Zone" && value == "1,2"
        ));
    }

    #[test]
    fn test_multi_zone_value_survives_reimport() {
        let mut zonal = record("3");
        zonal.zone = "1,2".into();
        zonal.status = "Backlogged".into();

        let text = to_delimited(&with_rd_quota_column(&[zonal]), &ExportOptions::default()).unwrap();
        assert!(!text.contains('"'));

        let back = crate::transform::transform(&text).unwrap();
        let r = &back.records[0];
        assert_eq!(r.zone, "1,2");
        assert_eq!(r.cores, "N/A");
        assert_eq!(r.status, "Backlogged");
        assert_eq!(r.original_id, "3");
        assert_eq!(r.request_type_code, RequestTypeCode::ZonalEnablement);
    }

    #[test]
    fn test_to_delimited_semicolon() {
        let options = ExportOptions {
            delimiter: b';',
            include_original_id: true,
        };
        let text = to_delimited(&[record("9")], &options).unwrap();
        assert!(text.starts_with("Subscription ID;Request Type;"));
        assert!(text.contains(";Approved;9"));
    }
}
