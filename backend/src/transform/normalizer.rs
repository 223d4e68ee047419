//! Row normalization.
//!
//! Two mutually exclusive modes, picked once per dataset:
//!
//! - [`normalize_canonical`] for input that already uses canonical headers
//!   (re-imported exports, hand-edited sheets)
//! - [`normalize_raw_export`] for native ticketing-system exports
//!
//! Both produce fresh [`CanonicalRecord`]s and drop structurally empty rows,
//! each with its own emptiness rule.

use std::collections::BTreeMap;

use super::cleaners::{clean_region, clean_vm_type, RegionCleaning};
use super::columns::{canonical, cell, raw, HeaderMap};
use super::vocabulary::{code_from_display, map_request_type, map_status, ZONAL_TICKET};
use crate::config::SYNTHETIC_ID_PREFIX;
use crate::error::TransformError;
use crate::models::{CanonicalRecord, RequestTypeCode, NOT_APPLICABLE};
use crate::parser::RawRow;

/// Outcome of normalizing a dataset
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Records that survived the emptiness filter, in source order
    pub records: Vec<CanonicalRecord>,
    /// Data rows dropped as structurally empty
    pub dropped: usize,
}

// =============================================================================
// Canonical-input mode
// =============================================================================

/// Column indices for canonical input
struct CanonicalColumns {
    subscription_id: Option<usize>,
    request_type: Option<usize>,
    vm_type: Option<usize>,
    region: Option<usize>,
    zone: Option<usize>,
    cores: Option<usize>,
    status: Option<usize>,
    original_id: Option<usize>,
}

impl CanonicalColumns {
    fn resolve(headers: &HeaderMap) -> Self {
        Self {
            subscription_id: headers.resolve(canonical::SUBSCRIPTION_ID),
            request_type: headers.resolve(canonical::REQUEST_TYPE),
            vm_type: headers.resolve(canonical::VM_TYPE),
            region: headers.resolve(canonical::REGION),
            zone: headers.resolve(canonical::ZONE),
            cores: headers.resolve(canonical::CORES),
            status: headers.resolve(canonical::STATUS),
            original_id: headers.resolve(canonical::ORIGINAL_ID),
        }
    }
}

/// Normalize rows whose headers are already canonical.
///
/// The request-type label is kept as written; its code comes from the
/// EN/PT-BR display table. Rows with no subscription, VM type and region
/// are dropped.
pub fn normalize_canonical(headers: &HeaderMap, rows: &[RawRow], region_cleaning: RegionCleaning) -> Normalized {
    let cols = CanonicalColumns::resolve(headers);
    let mut out = Normalized::default();

    for (row_idx, row) in rows.iter().enumerate() {
        let subscription_id = cell(row, cols.subscription_id).to_string();
        let vm_type = clean_vm_type(cell(row, cols.vm_type));
        let region = clean_region(cell(row, cols.region), region_cleaning);

        if subscription_id.is_empty() && vm_type.is_empty() && region.is_empty() {
            out.dropped += 1;
            continue;
        }

        let label = cell(row, cols.request_type).to_string();
        let code = code_from_display(&label);

        let zone = match cell(row, cols.zone) {
            "" => NOT_APPLICABLE.to_string(),
            z => z.to_string(),
        };

        let cores = match cell(row, cols.cores) {
            NOT_APPLICABLE if code != RequestTypeCode::ZonalEnablement => String::new(),
            c => c.to_string(),
        };

        let original_id = match cell(row, cols.original_id) {
            "" => format!("{}{}", SYNTHETIC_ID_PREFIX, row_idx),
            id => id.to_string(),
        };

        out.records.push(CanonicalRecord {
            subscription_id,
            request_type_label: label,
            vm_type,
            region,
            zone,
            cores,
            status: map_status(cell(row, cols.status)),
            original_id,
            request_type_code: code,
            extensions: BTreeMap::new(),
        });
    }

    out
}

// =============================================================================
// Raw-export mode
// =============================================================================

/// Column indices for a raw export
struct RawColumns {
    id: usize,
    subscription_id: usize,
    region: usize,
    request_type: Option<usize>,
    zone: Option<usize>,
    cores: Option<usize>,
    status: Option<usize>,
    vm_type: Option<usize>,
}

fn require(headers: &HeaderMap, aliases: &[&str], field: &str) -> Result<usize, TransformError> {
    headers
        .resolve(aliases)
        .ok_or_else(|| TransformError::MissingRequiredColumn(field.to_string()))
}

impl RawColumns {
    fn resolve(headers: &HeaderMap) -> Result<Self, TransformError> {
        Ok(Self {
            id: require(headers, raw::ID, "ID")?,
            subscription_id: require(headers, raw::SUBSCRIPTION_ID, "Subscription ID")?,
            region: require(headers, raw::REGION, "Region")?,
            request_type: headers.resolve(raw::REQUEST_TYPE),
            zone: headers.resolve(raw::ZONE),
            cores: headers.resolve(raw::CORES),
            status: headers.resolve(raw::STATUS),
            vm_type: headers.resolve(raw::VM_TYPE),
        })
    }
}

/// Normalize rows of a native ticketing-system export.
///
/// Fails with [`TransformError::MissingRequiredColumn`] when the id,
/// subscription or region column cannot be resolved. Optional columns read
/// as empty.
pub fn normalize_raw_export(
    headers: &HeaderMap,
    rows: &[RawRow],
    region_cleaning: RegionCleaning,
) -> Result<Normalized, TransformError> {
    let cols = RawColumns::resolve(headers)?;
    let mut out = Normalized::default();

    for row in rows {
        let raw_type = cell(row, cols.request_type);
        let (label, code) = map_request_type(raw_type);

        let raw_cores = cell(row, cols.cores);
        let cores = if raw_type == ZONAL_TICKET {
            NOT_APPLICABLE.to_string()
        } else if raw_cores == "-1" || raw_cores == NOT_APPLICABLE {
            // N/A cores are reserved for zonal enablement
            String::new()
        } else {
            raw_cores.to_string()
        };

        let zone = match cell(row, cols.zone) {
            "" => NOT_APPLICABLE.to_string(),
            z => z.to_string(),
        };

        let record = CanonicalRecord {
            subscription_id: cell(row, Some(cols.subscription_id)).to_string(),
            request_type_label: label,
            vm_type: clean_vm_type(cell(row, cols.vm_type)),
            region: clean_region(cell(row, Some(cols.region)), region_cleaning),
            zone,
            cores,
            status: map_status(cell(row, cols.status)),
            original_id: cell(row, Some(cols.id)).to_string(),
            request_type_code: code,
            extensions: BTreeMap::new(),
        };

        if is_empty_raw_record(&record) {
            out.dropped += 1;
        } else {
            out.records.push(record);
        }
    }

    Ok(out)
}

/// A raw record is empty when only the zone default is left.
fn is_empty_raw_record(record: &CanonicalRecord) -> bool {
    record.zone == NOT_APPLICABLE
        && record.subscription_id.is_empty()
        && record.vm_type.is_empty()
        && record.region.is_empty()
        && record.request_type_label.is_empty()
}
