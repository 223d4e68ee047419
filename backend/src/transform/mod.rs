//! Transformation module.
//!
//! Raw rows to canonical records:
//! - Columns: header map and alias resolution
//! - Cleaners: region / VM type / display value normalization
//! - Vocabulary: request type and status tables
//! - Normalizer: canonical-input and raw-export modes
//! - Grouper: records by request category
//! - Pipeline: the orchestrator

pub mod cleaners;
pub mod columns;
pub mod grouper;
pub mod normalizer;
pub mod pipeline;
pub mod vocabulary;

pub use cleaners::{clean_region, clean_value, clean_vm_type, RegionCleaning};
pub use columns::{detect_shape, HeaderMap, CANONICAL_HEADERS};
pub use grouper::categorize;
pub use pipeline::*;
