//! # Quotaload - canonical records from cloud quota request exports
//!
//! Quotaload turns loosely structured tabular exports (ticketing system
//! dumps, spreadsheets, already-normalized sheets) into one canonical record
//! schema, grouped by request category.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Raw text   │────▶│   Parser    │────▶│  Normalizer │────▶│  Records +  │
//! │ (TSV/CSV/;) │     │ sep + header│     │ (two modes) │     │   groups    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quotaload::transform;
//!
//! let out = transform(&std::fs::read_to_string("export.tsv")?)?;
//! println!("{} records in {} categories", out.records.len(), out.groups.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Canonical record, request type code, category groups
//! - [`parser`] - Decoding, separator detection, header location
//! - [`transform`] - Columns, cleaners, vocabulary, normalizer, grouping, pipeline
//! - [`export`] - Display rows and delimited re-serialization
//! - [`validation`] - JSON schema validation of records
//! - [`config`] - Constants and environment variable names
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Display / export boundary
pub mod export;

// Validation
pub mod validation;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{CsvError, PipelineError, ServerError, TransformError, ValidationError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CanonicalRecord, CategoryGroups, RequestTypeCode, SchemaShape, NOT_APPLICABLE};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_auto, decode_content, detect_encoding, detect_separator, locate_header, parse_table,
    HeaderDetection, HeaderStrategy, LocatedHeader, ParsedTable, RawRow,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::pipeline::{
    transform, transform_bytes, transform_file, transform_text, transform_with_options,
    PipelineResult, TransformInfo, TransformOptions, TransformOutput,
};
pub use transform::{categorize, clean_region, clean_value, clean_vm_type, RegionCleaning};

// =============================================================================
// Re-exports - Export / Validation
// =============================================================================

pub use export::{to_delimited, to_display_rows, with_rd_quota_column, ExportOptions};
pub use validation::{is_valid_canonical_record, validate_canonical_record, validate_canonical_records};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, TransformResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
