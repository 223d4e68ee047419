//! Column resolution.
//!
//! A [`HeaderMap`] maps lower-cased header names to column indices. Fields are
//! resolved through alias lists so renamed headers still land on the right
//! column; the first alias present wins.

use std::collections::HashMap;

use crate::models::SchemaShape;

// =============================================================================
// Alias tables
// =============================================================================

/// Aliases for a raw ticketing-system export.
pub mod raw {
    pub const ID: &[&str] = &["ID", "RDQuota", "QuotaId"];
    pub const SUBSCRIPTION_ID: &[&str] = &["Subscription ID", "SubscriptionId"];
    pub const REGION: &[&str] = &["Region", "Location"];
    pub const REQUEST_TYPE: &[&str] = &["UTC Ticket", "Ticket", "Request Type", "Type"];
    pub const ZONE: &[&str] = &["Deployment Constraints", "Zone", "Zones"];
    pub const CORES: &[&str] = &["Event ID", "Cores", "Core Count"];
    pub const STATUS: &[&str] = &["Reason", "Status", "State"];
    pub const VM_TYPE: &[&str] = &["SKU", "VM Type", "VmSize"];
}

/// Aliases for data already in canonical form.
pub mod canonical {
    pub const SUBSCRIPTION_ID: &[&str] = &["Subscription ID", "SubscriptionId", "Subscription"];
    pub const REQUEST_TYPE: &[&str] = &["Request Type", "RequestType"];
    pub const VM_TYPE: &[&str] = &["VM Type", "VmType", "VM Size", "VmSize"];
    pub const REGION: &[&str] = &["Region", "Location"];
    pub const ZONE: &[&str] = &["Zone", "Zones"];
    pub const CORES: &[&str] = &["Cores", "Core Count"];
    pub const STATUS: &[&str] = &["Status", "State"];
    pub const ORIGINAL_ID: &[&str] = &["Original ID", "OriginalId", "RDQuota", "QuotaId", "ID"];
}

/// Canonical header set, in display order.
pub const CANONICAL_HEADERS: [&str; 7] = [
    "Subscription ID",
    "Request Type",
    "VM Type",
    "Region",
    "Zone",
    "Cores",
    "Status",
];

/// Metadata column carried alongside the canonical headers.
pub const ORIGINAL_ID_HEADER: &str = "Original ID";

// =============================================================================
// Header map
// =============================================================================

/// Lower-cased header name -> column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    /// Build from header cells. On duplicate names the last one wins.
    pub fn new(headers: &[String]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        Self { columns }
    }

    /// Index of the first alias present (case-insensitive).
    pub fn resolve(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.columns.get(&alias.trim().to_lowercase()).copied())
    }

    pub fn contains(&self, aliases: &[&str]) -> bool {
        self.resolve(aliases).is_some()
    }
}

/// Read a resolved column from a row; missing columns and short rows read as `""`.
pub fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(|s| s.as_str())
        .unwrap_or("")
}

/// Decide the dataset shape from its headers.
///
/// Canonical iff Subscription ID, Request Type, VM Type and Region all resolve.
pub fn detect_shape(headers: &HeaderMap) -> SchemaShape {
    let canonical = [
        canonical::SUBSCRIPTION_ID,
        canonical::REQUEST_TYPE,
        canonical::VM_TYPE,
        canonical::REGION,
    ]
    .iter()
    .all(|aliases| headers.contains(aliases));

    if canonical {
        SchemaShape::Canonical
    } else {
        SchemaShape::RawExport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> HeaderMap {
        let cells: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        HeaderMap::new(&cells)
    }

    #[test]
    fn test_resolve_first_alias_wins() {
        let map = headers(&["Type", "UTC Ticket", "Region"]);
        assert_eq!(map.resolve(raw::REQUEST_TYPE), Some(1));
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let map = headers(&["subscriptionid", " LOCATION "]);
        assert_eq!(map.resolve(raw::SUBSCRIPTION_ID), Some(0));
        assert_eq!(map.resolve(raw::REGION), Some(1));
        assert_eq!(map.resolve(raw::ZONE), None);
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let map = headers(&["Region", "ID", "region"]);
        assert_eq!(map.resolve(raw::REGION), Some(2));
        assert_eq!(map.resolve(raw::ID), Some(1));
    }

    #[test]
    fn test_cell_defaults_to_empty() {
        let row = vec!["a".to_string()];
        assert_eq!(cell(&row, Some(0)), "a");
        assert_eq!(cell(&row, Some(3)), "");
        assert_eq!(cell(&row, None), "");
    }

    #[test]
    fn test_detect_shape_canonical() {
        let map = headers(&["RDQuota", "Subscription ID", "Request Type", "VM Type", "Region", "Zone"]);
        assert_eq!(detect_shape(&map), SchemaShape::Canonical);
    }

    #[test]
    fn test_detect_shape_raw_export() {
        let map = headers(&[
            "ID",
            "Subscription ID",
            "Region",
            "UTC Ticket",
            "Deployment Constraints",
            "Event ID",
            "Reason",
            "SKU",
        ]);
        assert_eq!(detect_shape(&map), SchemaShape::RawExport);
    }
}
