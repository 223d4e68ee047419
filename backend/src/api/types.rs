//! REST API types.
//!
//! Records are returned with canonical header names as JSON keys; groups are
//! returned as an array sorted by label so clients can render them directly.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::export::with_rd_quota_column;
use crate::models::{CanonicalRecord, SchemaShape};
use crate::parser::{format_separator, HeaderStrategy};
use crate::transform::pipeline::PipelineResult;

/// Response sent after a successful transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "ready" or "warning"
    pub status: String,

    /// Canonical records in source order, with an `RDQuota` display column
    pub records: Vec<CanonicalRecord>,

    /// Category groups sorted by label
    pub groups: Vec<CategoryGroup>,

    /// Metadata about the transformation
    pub metadata: ResponseMetadata,
}

/// One category and its records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub label: String,
    pub count: usize,
    pub records: Vec<CanonicalRecord>,
}

/// Metadata about the transformation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub encoding: String,
    pub separator: String,
    pub header_row: usize,
    pub header_strategy: HeaderStrategy,
    pub shape: SchemaShape,
    pub columns: Vec<String>,
    pub total_records: usize,
    pub dropped_rows: usize,
    pub validation: ValidationStats,
}

/// Validation statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<ValidationIssue>,
}

/// Validation errors for one record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub record_index: usize,
    pub errors: Vec<String>,
}

impl From<PipelineResult> for TransformResponse {
    fn from(result: PipelineResult) -> Self {
        let output = result.output;

        let groups = output
            .groups
            .sorted_labels()
            .into_iter()
            .filter_map(|label| {
                output.groups.get(label).map(|rows| CategoryGroup {
                    label: label.to_string(),
                    count: rows.len(),
                    records: with_rd_quota_column(rows),
                })
            })
            .collect();

        TransformResponse {
            job_id: Uuid::new_v4().to_string(),
            status: if result.invalid_count == 0 { "ready" } else { "warning" }.to_string(),
            records: with_rd_quota_column(&output.records),
            groups,
            metadata: ResponseMetadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                encoding: result.encoding,
                separator: format_separator(output.info.separator).to_string(),
                header_row: output.info.header_row,
                header_strategy: output.info.header_strategy,
                shape: output.info.shape,
                columns: output.info.headers,
                total_records: output.records.len(),
                dropped_rows: output.info.dropped_rows,
                validation: ValidationStats {
                    valid: result.valid_count,
                    invalid: result.invalid_count,
                    errors: result
                        .validation_errors
                        .into_iter()
                        .map(|(idx, errs)| ValidationIssue {
                            record_index: idx,
                            errors: errs,
                        })
                        .collect(),
                },
            },
        }
    }
}

/// Create an error response carrying the failure message verbatim
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "records": [],
        "groups": []
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::pipeline::{transform_text, TransformOptions};

    #[test]
    fn test_response_groups_sorted_with_counts() {
        let text = "\
ID,Subscription ID,Region,UTC Ticket,SKU
1,sub,East US,Quota Increase,Standard_D2s_v3
2,sub,East US,AZ Enablement/Whitelisting,Standard_D2s_v3
3,sub,East US,Quota Increase,Standard_D2s_v3
";
        let result = transform_text(text, &TransformOptions::default()).unwrap();
        let response = TransformResponse::from(result);

        assert_eq!(response.status, "ready");
        assert_eq!(response.groups.len(), 2);
        assert_eq!(response.groups[0].label, "Quota Increase");
        assert_eq!(response.groups[0].count, 2);
        assert_eq!(response.groups[1].label, "Zonal Enablement");
        assert_eq!(response.metadata.separator, ",");
        assert_eq!(response.metadata.total_records, 3);
        assert_eq!(response.records[0].extensions.get("RDQuota").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_response_json_shape() {
        let text = "ID;Subscription ID;Region\n1;sub;East US\n";
        let result = transform_text(text, &TransformOptions::default()).unwrap();
        let json = serde_json::to_value(TransformResponse::from(result)).unwrap();

        assert!(json["jobId"].is_string());
        assert_eq!(json["metadata"]["shape"], "raw_export");
        assert_eq!(json["records"][0]["Region"], "East US");
        assert_eq!(json["records"][0]["RequestTypeCode"], "UNKNOWN");
    }

    #[test]
    fn test_error_response() {
        let json = error_response("Input is empty");
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Input is empty");
    }
}
