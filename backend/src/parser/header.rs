//! Header row discovery.
//!
//! Two strategies: [`HeaderStrategy::RowScan`] takes the first row with an
//! id-like cell, [`HeaderStrategy::FirstRow`] insists on row 0. Which ones
//! run, and in what order, is chosen per call with [`HeaderDetection`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::RawRow;
use crate::config::ID_COLUMN_NAMES;
use crate::error::TransformError;

/// A single way of finding the header row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// Scan top to bottom for the first row with an id-like cell.
    RowScan,
    /// Row 0 is the header; it must still carry an id-like cell.
    FirstRow,
}

/// Which strategies to try, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeaderDetection {
    /// Row scan, then first row if the scan fails.
    #[default]
    PrimaryWithFallback,
    /// Row scan only.
    RowScanOnly,
    /// First row only.
    FirstRowOnly,
}

impl HeaderDetection {
    pub fn strategies(&self) -> &'static [HeaderStrategy] {
        match self {
            Self::PrimaryWithFallback => &[HeaderStrategy::RowScan, HeaderStrategy::FirstRow],
            Self::RowScanOnly => &[HeaderStrategy::RowScan],
            Self::FirstRowOnly => &[HeaderStrategy::FirstRow],
        }
    }
}

impl FromStr for HeaderDetection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "primary" | "primary-with-fallback" | "auto" => Ok(Self::PrimaryWithFallback),
            "row-scan" | "scan" => Ok(Self::RowScanOnly),
            "first-row" | "first" => Ok(Self::FirstRowOnly),
            other => Err(format!(
                "unknown header detection '{}' (expected primary, row-scan or first-row)",
                other
            )),
        }
    }
}

/// The header row once found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedHeader {
    /// Index into the parsed rows
    pub index: usize,
    /// Header cells as they appear in the source
    pub cells: RawRow,
    /// Strategy that found it
    pub strategy: HeaderStrategy,
}

/// Whether a cell names an id-like column.
pub fn is_id_cell(cell: &str) -> bool {
    let normalized = cell.trim().to_lowercase();
    ID_COLUMN_NAMES.contains(&normalized.as_str())
}

fn has_id_cell(row: &[String]) -> bool {
    row.iter().any(|cell| is_id_cell(cell))
}

impl HeaderStrategy {
    /// Run this strategy alone.
    pub fn locate(&self, rows: &[RawRow]) -> Result<LocatedHeader, TransformError> {
        let index = match self {
            Self::RowScan => rows.iter().position(|row| has_id_cell(row)),
            Self::FirstRow => rows.first().filter(|row| has_id_cell(row)).map(|_| 0),
        }
        .ok_or(TransformError::MissingHeader)?;

        Ok(LocatedHeader {
            index,
            cells: rows[index].clone(),
            strategy: *self,
        })
    }
}

/// Locate the header row, trying each configured strategy in turn.
pub fn locate_header(rows: &[RawRow], detection: HeaderDetection) -> Result<LocatedHeader, TransformError> {
    let mut last_err = TransformError::MissingHeader;

    for strategy in detection.strategies() {
        match strategy.locate(rows) {
            Ok(header) => return Ok(header),
            Err(e) => last_err = e,
        }
    }

    Err(last_err)
}
