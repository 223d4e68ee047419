//! Vocabulary tables.
//!
//! Three declarative lookups:
//!
//! | Table | From | To |
//! |-------|------|----|
//! | [`REQUEST_TYPE_RENAMES`] | raw ticket text | final label + code |
//! | [`STATUS_MAPPINGS`] | raw/legacy status | final status |
//! | [`DISPLAY_LABELS`] | EN / PT-BR display label | code |
//!
//! Keep the tables as data; lookups below never branch on individual values.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::RequestTypeCode;

/// Raw ticket text -> (final label, code).
pub const REQUEST_TYPE_RENAMES: [(&str, &str, RequestTypeCode); 7] = [
    ("AZ Enablement/Whitelisting", "Zonal Enablement", RequestTypeCode::ZonalEnablement),
    ("Region Enablement/Whitelisting", "Region Enablement", RequestTypeCode::RegionalEnablement),
    (
        "Whitelisting/Quota Increase",
        "Region Enablement & Quota Increase",
        RequestTypeCode::RegionEnablementQuotaIncrease,
    ),
    ("Quota Increase", "Quota Increase", RequestTypeCode::QuotaIncrease),
    ("Quota Decrease", "Quota Decrease", RequestTypeCode::QuotaDecrease),
    ("Region Limit Increase", "Region Limit Increase", RequestTypeCode::RegionLimitIncrease),
    ("RI Enablement/Whitelisting", "Reserved Instances", RequestTypeCode::ReservedInstances),
];

/// Raw/legacy status -> final status.
pub const STATUS_MAPPINGS: [(&str, &str); 4] = [
    ("Fulfillment Actions Completed", "Fulfilled"),
    ("Verification Successful", "Approved"),
    ("Abandoned", "Backlogged"),
    ("-", "Pending Customer Response"),
];

/// Code -> (English label, Brazilian Portuguese label).
pub const DISPLAY_LABELS: [(RequestTypeCode, &str, &str); 7] = [
    (RequestTypeCode::ZonalEnablement, "Zonal Enablement", "Habilitação Zonal"),
    (RequestTypeCode::RegionalEnablement, "Region Enablement", "Habilitação de Região"),
    (
        RequestTypeCode::RegionEnablementQuotaIncrease,
        "Region Enablement & Quota Increase",
        "Habilitação de Região e Aumento de Cota",
    ),
    (RequestTypeCode::QuotaIncrease, "Quota Increase", "Aumento de Cota"),
    (RequestTypeCode::QuotaDecrease, "Quota Decrease", "Redução de Cota"),
    (RequestTypeCode::RegionLimitIncrease, "Region Limit Increase", "Aumento de Limite de Região"),
    (RequestTypeCode::ReservedInstances, "Reserved Instances", "Instâncias Reservadas"),
];

/// Ticket text the normalizer treats specially (cores forced to `N/A`).
pub const ZONAL_TICKET: &str = "AZ Enablement/Whitelisting";

static RENAME_INDEX: Lazy<HashMap<&'static str, (&'static str, RequestTypeCode)>> = Lazy::new(|| {
    REQUEST_TYPE_RENAMES
        .iter()
        .map(|(raw, label, code)| (*raw, (*label, *code)))
        .collect()
});

static STATUS_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| STATUS_MAPPINGS.iter().copied().collect());

/// Lower-cased EN and PT-BR labels -> code.
static DISPLAY_INDEX: Lazy<HashMap<String, RequestTypeCode>> = Lazy::new(|| {
    DISPLAY_LABELS
        .iter()
        .flat_map(|(code, en, pt)| [(en.to_lowercase(), *code), (pt.to_lowercase(), *code)])
        .collect()
});

/// Translate raw ticket text into `(label, code)`.
///
/// Unmapped text keeps its own wording as the label, with code `Unknown`.
pub fn map_request_type(raw: &str) -> (String, RequestTypeCode) {
    let raw = raw.trim();
    match RENAME_INDEX.get(raw) {
        Some((label, code)) => (label.to_string(), *code),
        None => (raw.to_string(), RequestTypeCode::Unknown),
    }
}

/// Translate a status; unmapped values pass through unchanged.
pub fn map_status(raw: &str) -> String {
    let raw = raw.trim();
    STATUS_INDEX
        .get(raw)
        .map(|s| s.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Resolve an English or Portuguese display label to its code.
pub fn code_from_display(label: &str) -> RequestTypeCode {
    DISPLAY_INDEX
        .get(&label.trim().to_lowercase())
        .copied()
        .unwrap_or(RequestTypeCode::Unknown)
}

/// English display label for a code, if it has one.
pub fn english_label(code: RequestTypeCode) -> Option<&'static str> {
    DISPLAY_LABELS.iter().find(|(c, _, _)| *c == code).map(|(_, en, _)| *en)
}

/// Portuguese display label for a code, if it has one.
pub fn portuguese_label(code: RequestTypeCode) -> Option<&'static str> {
    DISPLAY_LABELS.iter().find(|(c, _, _)| *c == code).map(|(_, _, pt)| *pt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_code_has_rename_and_labels() {
        for code in RequestTypeCode::ALL.iter().filter(|c| c.is_known()) {
            let renames = REQUEST_TYPE_RENAMES.iter().filter(|(_, _, c)| c == code).count();
            assert_eq!(renames, 1, "{} should have exactly one rename", code);
            assert!(english_label(*code).is_some(), "{} missing EN label", code);
            assert!(portuguese_label(*code).is_some(), "{} missing PT-BR label", code);
        }
        assert!(english_label(RequestTypeCode::Unknown).is_none());
    }

    #[test]
    fn test_rename_labels_match_display_labels() {
        for (_, label, code) in REQUEST_TYPE_RENAMES {
            assert_eq!(english_label(code), Some(label));
            assert_eq!(code_from_display(label), code);
        }
    }

    #[test]
    fn test_map_request_type() {
        assert_eq!(
            map_request_type("AZ Enablement/Whitelisting"),
            ("Zonal Enablement".to_string(), RequestTypeCode::ZonalEnablement)
        );
        assert_eq!(
            map_request_type("RI Enablement/Whitelisting"),
            ("Reserved Instances".to_string(), RequestTypeCode::ReservedInstances)
        );
        assert_eq!(
            map_request_type("Capacity Reservation"),
            ("Capacity Reservation".to_string(), RequestTypeCode::Unknown)
        );
    }

    #[test]
    fn test_map_status() {
        assert_eq!(map_status("Abandoned"), "Backlogged");
        assert_eq!(map_status("-"), "Pending Customer Response");
        assert_eq!(map_status("Fulfillment Actions Completed"), "Fulfilled");
        assert_eq!(map_status("Verification Successful"), "Approved");
        assert_eq!(map_status("In Review"), "In Review");
    }

    #[test]
    fn test_code_from_display_both_languages() {
        assert_eq!(code_from_display("Aumento de Cota"), RequestTypeCode::QuotaIncrease);
        assert_eq!(code_from_display("quota increase"), RequestTypeCode::QuotaIncrease);
        assert_eq!(code_from_display("Instâncias Reservadas"), RequestTypeCode::ReservedInstances);
        assert_eq!(code_from_display("Quota Bump"), RequestTypeCode::Unknown);
    }
}
