//! Transform orchestration.
//!
//! [`transform`] is the core contract: text in, canonical records and
//! category groups out, or exactly one [`TransformError`]. It is pure and
//! synchronous; every call re-derives everything from the buffer.
//!
//! [`transform_bytes`] and [`transform_file`] wrap it with encoding
//! detection, schema validation and progress logging.
//!
//! # Example
//!
//! ```rust,ignore
//! use quotaload::transform;
//!
//! let out = transform("ID\tSubscription ID\tRegion\tUTC Ticket\n1\tsub\tEast US\tQuota Increase")?;
//! for label in out.groups.sorted_labels() {
//!     println!("{}: {}", label, out.groups.get(label).map_or(0, |g| g.len()));
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::cleaners::RegionCleaning;
use super::columns::{detect_shape, HeaderMap};
use super::grouper::categorize;
use super::normalizer::{normalize_canonical, normalize_raw_export};
use crate::api::logs::{log_error, log_info, log_success, log_warning};
use crate::config::{ENV_HEADER_DETECTION, ENV_REGION_CLEANING, ENV_SKIP_VALIDATION};
use crate::error::{PipelineError, TransformError, TransformResult};
use crate::models::{CanonicalRecord, CategoryGroups, SchemaShape};
use crate::parser::{
    decode_auto, format_separator, locate_header, parse_table, read_file_auto, HeaderDetection,
    HeaderStrategy,
};
use crate::validation::validate_canonical_record;

/// Options for a transform call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransformOptions {
    /// Which header strategies to try, in order
    pub header_detection: HeaderDetection,

    /// Region normalization
    pub region_cleaning: RegionCleaning,

    /// Validate records against the embedded schema (pipeline wrappers only)
    pub validate: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            header_detection: HeaderDetection::default(),
            region_cleaning: RegionCleaning::default(),
            validate: true,
        }
    }
}

impl TransformOptions {
    /// Defaults overridden by `QUOTALOAD_*` environment variables.
    ///
    /// Unparseable values are reported and ignored.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(value) = std::env::var(ENV_HEADER_DETECTION) {
            match value.parse() {
                Ok(detection) => options.header_detection = detection,
                Err(e) => log_warning(format!("{}: {}", ENV_HEADER_DETECTION, e)),
            }
        }

        if let Ok(value) = std::env::var(ENV_REGION_CLEANING) {
            match value.parse() {
                Ok(cleaning) => options.region_cleaning = cleaning,
                Err(e) => log_warning(format!("{}: {}", ENV_REGION_CLEANING, e)),
            }
        }

        if let Ok(value) = std::env::var(ENV_SKIP_VALIDATION) {
            options.validate = !matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }

        options
    }
}

/// What the transform decided along the way
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransformInfo {
    /// Detected separator
    pub separator: char,
    /// Index of the header row among non-empty, non-banner lines
    pub header_row: usize,
    /// Strategy that located the header
    pub header_strategy: HeaderStrategy,
    /// Header cells as found
    pub headers: Vec<String>,
    /// Dataset shape
    pub shape: SchemaShape,
    /// Data rows below the header
    pub data_rows: usize,
    /// Data rows dropped as empty
    pub dropped_rows: usize,
}

/// Successful transform
#[derive(Debug, Clone, Serialize)]
pub struct TransformOutput {
    /// Canonical records in source order
    pub records: Vec<CanonicalRecord>,
    /// Records grouped by final request-type label
    pub groups: CategoryGroups,
    /// Decisions taken
    pub info: TransformInfo,
}

/// Transform a raw buffer with default options.
pub fn transform(raw_text: &str) -> TransformResult<TransformOutput> {
    transform_with_options(raw_text, &TransformOptions::default())
}

/// Transform a raw buffer.
///
/// 1. Strip banners, split non-empty lines, detect separator, split cells
/// 2. Locate the header row (configured strategies, in order)
/// 3. Resolve columns and decide the shape once
/// 4. Normalize each data row, drop empties
/// 5. Group by category
pub fn transform_with_options(raw_text: &str, options: &TransformOptions) -> TransformResult<TransformOutput> {
    if raw_text.trim().is_empty() {
        return Err(TransformError::EmptyInput);
    }

    let table = parse_table(raw_text);
    if table.rows.len() < 2 {
        return Err(TransformError::InsufficientRows { found: table.rows.len() });
    }

    let header = locate_header(&table.rows, options.header_detection)?;
    let data = &table.rows[header.index + 1..];
    if data.is_empty() {
        return Err(TransformError::InsufficientRows { found: header.index + 1 });
    }

    let headers = HeaderMap::new(&header.cells);
    let shape = detect_shape(&headers);

    let normalized = match shape {
        SchemaShape::Canonical => normalize_canonical(&headers, data, options.region_cleaning),
        SchemaShape::RawExport => normalize_raw_export(&headers, data, options.region_cleaning)?,
    };

    if normalized.records.is_empty() {
        return Err(TransformError::NoValidRows);
    }

    let groups = categorize(&normalized.records);

    Ok(TransformOutput {
        records: normalized.records,
        groups,
        info: TransformInfo {
            separator: table.separator,
            header_row: header.index,
            header_strategy: header.strategy,
            headers: header.cells,
            shape,
            data_rows: data.len(),
            dropped_rows: normalized.dropped,
        },
    })
}

// =============================================================================
// Byte / file level pipeline
// =============================================================================

/// Result of the byte/file pipeline
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Core transform output
    pub output: TransformOutput,

    /// Detected encoding
    pub encoding: String,

    /// Records passing schema validation
    pub valid_count: usize,

    /// Records failing schema validation
    pub invalid_count: usize,

    /// Validation errors (record index, errors), first ten only
    pub validation_errors: Vec<(usize, Vec<String>)>,
}

/// Transform a file with auto-detected encoding.
pub fn transform_file(path: &Path, options: &TransformOptions) -> Result<PipelineResult, PipelineError> {
    log_info(format!("📖 Reading {}", path.display()));
    let (text, encoding) = read_file_auto(path)?;
    run_pipeline(&text, encoding, options)
}

/// Transform raw bytes with auto-detected encoding.
pub fn transform_bytes(bytes: &[u8], options: &TransformOptions) -> Result<PipelineResult, PipelineError> {
    log_info(format!("📖 Decoding {} bytes", bytes.len()));
    let (text, encoding) = decode_auto(bytes)?;
    run_pipeline(&text, encoding, options)
}

/// Transform already-decoded text, with logging and validation.
pub fn transform_text(text: &str, options: &TransformOptions) -> Result<PipelineResult, PipelineError> {
    run_pipeline(text, "utf-8".to_string(), options)
}

fn run_pipeline(text: &str, encoding: String, options: &TransformOptions) -> Result<PipelineResult, PipelineError> {
    log_success(format!("Detected encoding: {}", encoding));

    let output = transform_with_options(text, options).map_err(|e| {
        log_error(e.to_string());
        e
    })?;
    print_transform_info(&output.info);

    let (valid_count, invalid_count, validation_errors) = if options.validate {
        log_info("✔️  Validating records...");
        let result = validate_records(&output.records);
        print_validation_result(&result);
        result
    } else {
        log_info("(validation skipped)");
        (output.records.len(), 0, vec![])
    };

    log_info("📦 Grouping by request type...");
    for label in output.groups.sorted_labels() {
        let count = output.groups.get(label).map_or(0, |rows| rows.len());
        log_success(format!("{}: {} record(s)", display_label(label), count));
    }

    Ok(PipelineResult {
        output,
        encoding,
        valid_count,
        invalid_count,
        validation_errors,
    })
}

fn display_label(label: &str) -> &str {
    if label.is_empty() {
        "(no request type)"
    } else {
        label
    }
}

fn print_transform_info(info: &TransformInfo) {
    log_success(format!("Detected separator: '{}'", format_separator(info.separator)));
    log_success(format!(
        "Header at row {} ({:?}), {} columns",
        info.header_row,
        info.header_strategy,
        info.headers.len()
    ));
    log_success(format!("Input shape: {}", info.shape));
    if info.dropped_rows > 0 {
        log_warning(format!(
            "{} of {} data rows dropped as empty",
            info.dropped_rows, info.data_rows
        ));
    }
}

fn print_validation_result(result: &(usize, usize, Vec<(usize, Vec<String>)>)) {
    if result.1 == 0 {
        log_success(format!("All {} records valid!", result.0));
    } else {
        log_success(format!("Valid: {}", result.0));
        log_error(format!("Invalid: {}", result.1));
    }
}

/// Validate records and return statistics
fn validate_records(records: &[CanonicalRecord]) -> (usize, usize, Vec<(usize, Vec<String>)>) {
    let mut valid = 0;
    let mut invalid = 0;
    let mut errors = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let result = serde_json::to_value(record)
            .map_err(|e| vec![e.to_string()])
            .and_then(|value| validate_canonical_record(&value));

        match result {
            Ok(()) => valid += 1,
            Err(errs) => {
                invalid += 1;
                if errors.len() < 10 {
                    errors.push((i, errs));
                }
            }
        }
    }

    (valid, invalid, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{to_delimited, with_rd_quota_column, ExportOptions};
    use crate::models::RequestTypeCode;
    use std::io::Write;

    const RAW_EXPORT: &str = "\
Quota request export
ID\tSubscription ID\tRegion\tUTC Ticket\tDeployment Constraints\tEvent ID\tReason\tSKU
1001\tsub-a\tEast US\tQuota Increase\t\t64\tFulfillment Actions Completed\tStandard_D4s_v3
1002\tsub-a\tEast US\tAZ Enablement/Whitelisting\t1\t-1\tAbandoned\tStandard_M128s (XIO)
1003\tsub-b\tWest Europe\tQuota Increase\t\t-1\t-\tStandard_E8s_v5
1004\tsub-c\tBrazil South\tRI Enablement/Whitelisting\t\t16\tVerification Successful\tStandard_F4s
";

    #[test]
    fn test_default_options() {
        let opts = TransformOptions::default();
        assert_eq!(opts.header_detection, HeaderDetection::PrimaryWithFallback);
        assert_eq!(opts.region_cleaning, RegionCleaning::Trim);
        assert!(opts.validate);
    }

    #[test]
    fn test_options_deserialize_partial() {
        let opts: TransformOptions = serde_json::from_str(r#"{"region_cleaning":"strip_code"}"#).unwrap();
        assert_eq!(opts.region_cleaning, RegionCleaning::StripCode);
        assert_eq!(opts.header_detection, HeaderDetection::PrimaryWithFallback);
    }

    #[test]
    fn test_raw_export_end_to_end() {
        let out = transform(RAW_EXPORT).unwrap();

        assert_eq!(out.info.separator, '\t');
        assert_eq!(out.info.header_row, 1);
        assert_eq!(out.info.header_strategy, HeaderStrategy::RowScan);
        assert_eq!(out.info.shape, SchemaShape::RawExport);
        assert_eq!(out.records.len(), 4);

        let zonal = &out.records[1];
        assert_eq!(zonal.request_type_label, "Zonal Enablement");
        assert_eq!(zonal.request_type_code, RequestTypeCode::ZonalEnablement);
        assert_eq!(zonal.cores, "N/A");
        assert_eq!(zonal.vm_type, "Standard_M128s");
        assert_eq!(zonal.status, "Backlogged");
        assert_eq!(zonal.zone, "1");

        assert_eq!(out.records[0].status, "Fulfilled");
        assert_eq!(out.records[0].zone, "N/A");
        assert_eq!(out.records[2].cores, "");
        assert_eq!(out.records[2].status, "Pending Customer Response");
        assert_eq!(out.records[3].request_type_label, "Reserved Instances");
        assert_eq!(out.records[3].status, "Approved");
    }

    #[test]
    fn test_grouping_counts_and_order() {
        let out = transform(RAW_EXPORT).unwrap();

        assert_eq!(out.groups.len(), 3);
        let quota: Vec<&str> = out
            .groups
            .get("Quota Increase")
            .unwrap()
            .iter()
            .map(|r| r.original_id.as_str())
            .collect();
        assert_eq!(quota, vec!["1001", "1003"]);
        assert_eq!(out.groups.get("Zonal Enablement").unwrap().len(), 1);
        assert_eq!(
            out.groups.sorted_labels(),
            vec!["Quota Increase", "Reserved Instances", "Zonal Enablement"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(transform("").unwrap_err(), TransformError::EmptyInput);
        assert_eq!(transform("  \n\t\n").unwrap_err(), TransformError::EmptyInput);
    }

    #[test]
    fn test_header_only_is_insufficient() {
        let err = transform("Subscription ID\tRegion\n").unwrap_err();
        assert_eq!(err, TransformError::InsufficientRows { found: 1 });
    }

    #[test]
    fn test_header_on_last_line_is_insufficient() {
        let err = transform("Weekly quota report\nID,Subscription ID,Region\n").unwrap_err();
        assert!(matches!(err, TransformError::InsufficientRows { .. }));
    }

    #[test]
    fn test_missing_header() {
        let err = transform("Subscription ID\tRegion\nsub\tEast US\n").unwrap_err();
        assert_eq!(err, TransformError::MissingHeader);
    }

    #[test]
    fn test_first_row_only_rejects_prefixed_header() {
        let options = TransformOptions {
            header_detection: HeaderDetection::FirstRowOnly,
            ..TransformOptions::default()
        };
        let err = transform_with_options(RAW_EXPORT, &options).unwrap_err();
        assert_eq!(err, TransformError::MissingHeader);
    }

    #[test]
    fn test_missing_required_column() {
        let err = transform("ID,Region\n1,East US\n").unwrap_err();
        assert_eq!(err, TransformError::MissingRequiredColumn("Subscription ID".into()));
    }

    #[test]
    fn test_all_rows_empty() {
        let text = "ID\tSubscription ID\tRegion\tUTC Ticket\tDeployment Constraints\tSKU\n7\t\t\t\t\t\n";
        assert_eq!(transform(text).unwrap_err(), TransformError::NoValidRows);
    }

    #[test]
    fn test_comma_separated_canonical_input() {
        let text = "\
RDQuota,Subscription ID,Request Type,VM Type,Region,Zone,Cores,Status
55,sub-x,Aumento de Cota,Standard_D2s_v3,East US,,12,Approved
,sub-y,Redução de Cota,Standard_D2s_v3,East US,,4,Abandoned
";
        let out = transform(text).unwrap();

        assert_eq!(out.info.shape, SchemaShape::Canonical);
        assert_eq!(out.records[0].request_type_code, RequestTypeCode::QuotaIncrease);
        assert_eq!(out.records[0].original_id, "55");
        assert_eq!(out.records[1].request_type_code, RequestTypeCode::QuotaDecrease);
        assert_eq!(out.records[1].original_id, "pre-transformed-1");
        assert_eq!(out.records[1].status, "Backlogged");
    }

    #[test]
    fn test_reimport_preserves_code_and_status() {
        let first = transform(RAW_EXPORT).unwrap();

        let text = to_delimited(&with_rd_quota_column(&first.records), &ExportOptions::default()).unwrap();
        let second = transform(&text).unwrap();

        assert_eq!(second.info.shape, SchemaShape::Canonical);
        assert_eq!(second.records.len(), first.records.len());
        for (a, b) in first.records.iter().zip(&second.records) {
            assert_eq!(a.request_type_code, b.request_type_code);
            assert_eq!(a.status, b.status);
            assert_eq!(a.request_type_label, b.request_type_label);
            assert_eq!(a.original_id, b.original_id);
            assert_eq!(a.zone, b.zone);
            assert_eq!(a.cores, b.cores);
        }
    }

    #[test]
    fn test_transform_is_repeatable() {
        assert_eq!(transform(RAW_EXPORT).unwrap().records, transform(RAW_EXPORT).unwrap().records);
    }

    #[test]
    fn test_transform_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RAW_EXPORT.as_bytes()).unwrap();

        let result = transform_file(file.path(), &TransformOptions::default()).unwrap();
        assert_eq!(result.output.records.len(), 4);
        assert_eq!(result.valid_count, 4);
        assert_eq!(result.invalid_count, 0);
    }

    #[test]
    fn test_raw_na_cores_pass_validation() {
        let text = "ID\tSubscription ID\tRegion\tUTC Ticket\tEvent ID\tSKU\n1\tsub\tEast US\tQuota Increase\tN/A\tStandard_D2s_v3\n";
        let result = transform_text(text, &TransformOptions::default()).unwrap();

        assert_eq!(result.output.records[0].cores, "");
        assert_eq!(result.invalid_count, 0);
    }

    #[test]
    fn test_transform_bytes_surfaces_transform_error() {
        let err = transform_bytes(b"ID\tRegion\n", &TransformOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Transform(TransformError::InsufficientRows { .. })));
    }
}
