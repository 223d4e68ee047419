//! Application configuration.
//!
//! Fixed constants live here. Per-call behaviour is configured through
//! [`crate::transform::pipeline::TransformOptions`], whose defaults can be
//! overridden from the environment (or a `.env` file loaded at start-up).

/// Default HTTP port for `quotaload serve`.
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum upload size accepted by the HTTP server (in bytes).
///
/// 20 MB limit.
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Number of non-empty lines inspected when detecting the separator.
pub const SEPARATOR_SAMPLE_LINES: usize = 20;

/// Lower-cased header names that mark the header row.
pub const ID_COLUMN_NAMES: [&str; 3] = ["id", "rdquota", "quotaid"];

/// Display column carrying the ticketing system id.
pub const RD_QUOTA_COLUMN: &str = "RDQuota";

/// Prefix of synthesized ids for canonical rows without one.
pub const SYNTHETIC_ID_PREFIX: &str = "pre-transformed-";

/// Environment variable selecting the header detection strategy.
pub const ENV_HEADER_DETECTION: &str = "QUOTALOAD_HEADER_DETECTION";

/// Environment variable selecting the region cleaner.
pub const ENV_REGION_CLEANING: &str = "QUOTALOAD_REGION_CLEANING";

/// Environment variable disabling schema validation in the pipeline.
pub const ENV_SKIP_VALIDATION: &str = "QUOTALOAD_SKIP_VALIDATION";
