//! JSON Schema validation for serialized canonical records.
//!
//! The schema is embedded at compile time from
//! `schemas/canonical-record.json` (draft 7). It checks the fixed fields,
//! the `RequestTypeCode` vocabulary, the `Zone` sentinel and that `Cores`
//! is only `N/A` on zonal enablement.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use quotaload::validation::is_valid_canonical_record;
//!
//! let record = json!({
//!     "Subscription ID": "sub", "Request Type": "Quota Increase",
//!     "VM Type": "Standard_D2s_v3", "Region": "East US", "Zone": "N/A",
//!     "Cores": "8", "Status": "Approved", "Original ID": "1",
//!     "RequestTypeCode": "QUOTA_INCREASE"
//! });
//! assert!(is_valid_canonical_record(&record));
//! ```

use serde_json::Value;

use crate::error::ValidationError;

const CANONICAL_RECORD_SCHEMA: &str = include_str!("../../schemas/canonical-record.json");

/// Validate a JSON value against a schema.
///
/// Returns every violation as a message.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema).map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick true/false check.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// The embedded canonical record schema.
pub fn canonical_record_schema() -> Result<Value, ValidationError> {
    serde_json::from_str(CANONICAL_RECORD_SCHEMA).map_err(|e| ValidationError::InvalidSchema(e.to_string()))
}

/// Validate one serialized record.
pub fn validate_canonical_record(data: &Value) -> Result<(), Vec<String>> {
    let schema = canonical_record_schema().map_err(|e| vec![e.to_string()])?;
    validate(&schema, data)
}

/// Quick check of one serialized record.
pub fn is_valid_canonical_record(data: &Value) -> bool {
    canonical_record_schema()
        .map(|schema| is_valid(&schema, data))
        .unwrap_or(false)
}

/// Validate an array of serialized records, failing on the first bad one.
pub fn validate_canonical_records(records: &[Value]) -> Result<(), ValidationError> {
    let schema = canonical_record_schema()?;
    for (i, record) in records.iter().enumerate() {
        validate(&schema, record).map_err(|errors| ValidationError::SchemaError {
            errors: errors.into_iter().map(|e| format!("record {}: {}", i, e)).collect(),
        })?;
    }
    Ok(())
}
