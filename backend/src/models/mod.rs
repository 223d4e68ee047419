//! Domain models for the Quotaload transformation pipeline.
//!
//! - [`RequestTypeCode`] - language-independent request type
//! - [`CanonicalRecord`] - normalized quota request
//! - [`CategoryGroups`] - records grouped by final request-type label
//! - [`SchemaShape`] - which normalizer a dataset goes through

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Placeholder for "field intentionally not applicable".
pub const NOT_APPLICABLE: &str = "N/A";

// =============================================================================
// Request Type Code
// =============================================================================

/// Stable code for a request type.
///
/// Display labels may be localized; control logic only ever branches on this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestTypeCode {
    ZonalEnablement,
    RegionalEnablement,
    RegionEnablementQuotaIncrease,
    QuotaIncrease,
    QuotaDecrease,
    RegionLimitIncrease,
    ReservedInstances,
    Unknown,
}

impl RequestTypeCode {
    /// Every code, `Unknown` last.
    pub const ALL: [RequestTypeCode; 8] = [
        Self::ZonalEnablement,
        Self::RegionalEnablement,
        Self::RegionEnablementQuotaIncrease,
        Self::QuotaIncrease,
        Self::QuotaDecrease,
        Self::RegionLimitIncrease,
        Self::ReservedInstances,
        Self::Unknown,
    ];

    /// Wire name, e.g. `ZONAL_ENABLEMENT`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZonalEnablement => "ZONAL_ENABLEMENT",
            Self::RegionalEnablement => "REGIONAL_ENABLEMENT",
            Self::RegionEnablementQuotaIncrease => "REGION_ENABLEMENT_QUOTA_INCREASE",
            Self::QuotaIncrease => "QUOTA_INCREASE",
            Self::QuotaDecrease => "QUOTA_DECREASE",
            Self::RegionLimitIncrease => "REGION_LIMIT_INCREASE",
            Self::ReservedInstances => "RESERVED_INSTANCES",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a wire name back into a code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code.trim())
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

impl std::fmt::Display for RequestTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Canonical Record
// =============================================================================

/// A normalized quota request.
///
/// `zone` is a real value or [`NOT_APPLICABLE`]. `cores` is numeric-ish text,
/// empty, or [`NOT_APPLICABLE`] (zonal enablement only). Display-only columns
/// added by callers live in `extensions`, never in the fixed fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalRecord {
    #[serde(rename = "Subscription ID")]
    pub subscription_id: String,

    #[serde(rename = "Request Type")]
    pub request_type_label: String,

    #[serde(rename = "VM Type")]
    pub vm_type: String,

    #[serde(rename = "Region")]
    pub region: String,

    #[serde(rename = "Zone")]
    pub zone: String,

    #[serde(rename = "Cores")]
    pub cores: String,

    #[serde(rename = "Status")]
    pub status: String,

    #[serde(rename = "Original ID")]
    pub original_id: String,

    #[serde(rename = "RequestTypeCode")]
    pub request_type_code: RequestTypeCode,

    /// Caller-injected display columns.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, String>,
}

impl CanonicalRecord {
    /// Return a copy carrying an extra display column.
    pub fn with_extension(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut record = self.clone();
        record.extensions.insert(key.into(), value.into());
        record
    }

    /// Value of a canonical header, by its display name.
    pub fn field(&self, header: &str) -> Option<&str> {
        match header {
            "Subscription ID" => Some(&self.subscription_id),
            "Request Type" => Some(&self.request_type_label),
            "VM Type" => Some(&self.vm_type),
            "Region" => Some(&self.region),
            "Zone" => Some(&self.zone),
            "Cores" => Some(&self.cores),
            "Status" => Some(&self.status),
            "Original ID" => Some(&self.original_id),
            other => self.extensions.get(other).map(String::as_str),
        }
    }
}

// =============================================================================
// Schema Shape
// =============================================================================

/// Shape of the input dataset, decided once per transform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchemaShape {
    /// Columns already follow the canonical header set.
    Canonical,
    /// Native ticketing-system export needing full normalization.
    RawExport,
}

impl std::fmt::Display for SchemaShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canonical => f.write_str("canonical"),
            Self::RawExport => f.write_str("raw export"),
        }
    }
}

// =============================================================================
// Category Groups
// =============================================================================

/// Records grouped by final request-type label.
///
/// Rows within a group keep source order. Labels are remembered in order of
/// first appearance; use [`CategoryGroups::sorted_labels`] for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryGroups {
    order: Vec<String>,
    groups: HashMap<String, Vec<CanonicalRecord>>,
}

impl CategoryGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: CanonicalRecord) {
        let label = record.request_type_label.clone();
        match self.groups.get_mut(&label) {
            Some(rows) => rows.push(record),
            None => {
                self.order.push(label.clone());
                self.groups.insert(label, vec![record]);
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&[CanonicalRecord]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Labels in order of first appearance.
    pub fn labels(&self) -> &[String] {
        &self.order
    }

    /// Labels sorted alphabetically.
    pub fn sorted_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.order.iter().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Iterate groups in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CanonicalRecord])> {
        self.order
            .iter()
            .filter_map(|label| self.groups.get(label).map(|rows| (label.as_str(), rows.as_slice())))
    }
}

impl Serialize for CategoryGroups {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (label, rows) in self.iter() {
            map.serialize_entry(label, rows)?;
        }
        map.end()
    }
}
