//! Group canonical records by request category.
//!
//! ```text
//! Records                                  Groups
//! ┌──────────────────────────────┐        ┌──────────────────────────┐
//! │ #1  Quota Increase           │        │ Quota Increase   [#1, #3]│
//! │ #2  Zonal Enablement         │   →    ├──────────────────────────┤
//! │ #3  Quota Increase           │        │ Zonal Enablement [#2]    │
//! └──────────────────────────────┘        └──────────────────────────┘
//! ```
//!
//! One linear pass, keyed by the final request-type label. No sorting here.

use crate::models::{CanonicalRecord, CategoryGroups};

/// Group records by their final request-type label, preserving row order.
pub fn categorize(records: &[CanonicalRecord]) -> CategoryGroups {
    let mut groups = CategoryGroups::new();
    for record in records {
        groups.push(record.clone());
    }
    groups
}
