//! Stateless value cleaners.
//!
//! `clean_vm_type` and `clean_region` run inside normalization. `clean_value`
//! belongs to the display/export boundary and is never applied by the core.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

static XIO_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\(xio\)\s*$").expect("valid XIO pattern"));

static REGION_CODE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([A-Za-z]+\)\s*$").expect("valid region code pattern"));

/// How region values are normalized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegionCleaning {
    /// Trim whitespace only.
    #[default]
    Trim,
    /// Trim and drop a trailing letter code, `East US (EUS)` -> `East US`.
    StripCode,
}

impl FromStr for RegionCleaning {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "trim" => Ok(Self::Trim),
            "strip-code" | "strip" => Ok(Self::StripCode),
            other => Err(format!("unknown region cleaning '{}' (expected trim or strip-code)", other)),
        }
    }
}

/// Remove a trailing `(XIO)` marker (any case), then trim.
pub fn clean_vm_type(value: &str) -> String {
    XIO_SUFFIX.replace(value, "").trim().to_string()
}

/// Normalize a region according to `mode`.
pub fn clean_region(value: &str, mode: RegionCleaning) -> String {
    match mode {
        RegionCleaning::Trim => value.trim().to_string(),
        RegionCleaning::StripCode => REGION_CODE_SUFFIX.replace(value.trim(), "").trim().to_string(),
    }
}

/// Display-boundary cleaner: null becomes `""`, strings are trimmed,
/// everything else passes through.
pub fn clean_value(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_vm_type_strips_xio() {
        assert_eq!(clean_vm_type("Standard_M128s (XIO)"), "Standard_M128s");
        assert_eq!(clean_vm_type("Standard_M128s(xio) "), "Standard_M128s");
        assert_eq!(clean_vm_type("  Standard_D2s_v3 "), "Standard_D2s_v3");
    }

    #[test]
    fn test_clean_vm_type_only_trailing_marker() {
        assert_eq!(clean_vm_type("(XIO) Standard_M128s"), "(XIO) Standard_M128s");
    }

    #[test]
    fn test_clean_region_trim() {
        assert_eq!(clean_region("  East US (EUS) ", RegionCleaning::Trim), "East US (EUS)");
    }

    #[test]
    fn test_clean_region_strip_code() {
        assert_eq!(clean_region("East US (EUS)", RegionCleaning::StripCode), "East US");
        assert_eq!(clean_region("Brazil South", RegionCleaning::StripCode), "Brazil South");
        assert_eq!(clean_region("West US 2 (WUS2)", RegionCleaning::StripCode), "West US 2 (WUS2)");
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(&Value::Null), json!(""));
        assert_eq!(clean_value(&json!("  a ")), json!("a"));
        assert_eq!(clean_value(&json!(12)), json!(12));
        assert_eq!(clean_value(&json!(true)), json!(true));
    }

    #[test]
    fn test_region_cleaning_from_str() {
        assert_eq!("strip_code".parse::<RegionCleaning>(), Ok(RegionCleaning::StripCode));
        assert_eq!("Trim".parse::<RegionCleaning>(), Ok(RegionCleaning::Trim));
        assert!("upper".parse::<RegionCleaning>().is_err());
    }
}
