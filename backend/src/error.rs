//! Error types for the Quotaload transformation pipeline.
//!
//! One error type per layer:
//!
//! - [`CsvError`] - decoding raw bytes into a text buffer
//! - [`TransformError`] - the core transform (text in, canonical records out)
//! - [`ValidationError`] - schema validation of serialized records
//! - [`PipelineError`] - file/byte level orchestration
//! - [`ServerError`] - HTTP layer
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Input Decoding Errors
// =============================================================================

/// Errors while turning raw bytes into a delimited text buffer.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode content with the detected encoding.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// A value cannot be written without quoting.
    #[error("Value {value:?} in column '{column}' contains the delimiter or a line break")]
    UnrepresentableValue { column: String, value: String },

    /// Failed to write delimited output.
    #[error("Failed to write delimited output: {0}")]
    WriteError(String),
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Typed failures of the core transform.
///
/// The transform either fully succeeds or fails with exactly one of these.
/// Messages are meant to be shown to the operator verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    /// Buffer is blank after trimming.
    #[error("Input is empty")]
    EmptyInput,

    /// Fewer than one header line plus one data line.
    #[error("Expected a header line and at least one data line, found {found} line(s)")]
    InsufficientRows { found: usize },

    /// Neither header strategy found an id-like column.
    #[error("No header row found: expected a column named ID, RDQuota or QuotaId")]
    MissingHeader,

    /// Raw export lacks a column the normalizer cannot do without.
    #[error("Missing required column: {0}")]
    MissingRequiredColumn(String),

    /// Every data row was filtered out as structurally empty.
    #[error("No valid rows: every data row is empty")]
    NoValidRows,
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors during canonical record validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema validation failed.
    #[error("Validation failed: {errors:?}")]
    SchemaError { errors: Vec<String> },

    /// The embedded schema itself could not be loaded.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Returned by [`crate::transform::pipeline::transform_bytes`] and
/// [`crate::transform::pipeline::transform_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Decoding error.
    #[error("{0}")]
    Csv(#[from] CsvError),

    /// Core transform error.
    #[error("{0}")]
    Transform(#[from] TransformError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for the core transform.
pub type TransformResult<T> = Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // TransformError -> PipelineError keeps the message verbatim
        let err = TransformError::MissingRequiredColumn("Subscription ID".into());
        let pipeline_err: PipelineError = err.into();
        assert_eq!(pipeline_err.to_string(), "Missing required column: Subscription ID");

        // PipelineError -> ServerError
        let server_err: ServerError = pipeline_err.into();
        assert!(server_err.to_string().contains("Subscription ID"));
    }

    #[test]
    fn test_insufficient_rows_message() {
        let err = TransformError::InsufficientRows { found: 1 };
        assert!(err.to_string().contains("found 1 line"));
    }

    #[test]
    fn test_missing_header_names_id_columns() {
        let msg = TransformError::MissingHeader.to_string();
        assert!(msg.contains("RDQuota"));
        assert!(msg.contains("QuotaId"));
    }
}
