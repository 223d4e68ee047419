//! Delimited text parsing with encoding and separator auto-detection.
//!
//! Turns a raw buffer into rows of trimmed, quote-stripped cells. No quota
//! specific logic here beyond recognising export banner lines.

pub mod header;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::config::SEPARATOR_SAMPLE_LINES;
use crate::error::CsvError;

pub use header::{is_id_cell, locate_header, HeaderDetection, HeaderStrategy, LocatedHeader};

/// A raw row: ordered cells with no meaning until mapped.
pub type RawRow = Vec<String>;

/// Result of splitting a buffer into rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    /// Detected separator
    pub separator: char,
    /// Every non-empty, non-banner line split into cells
    pub rows: Vec<RawRow>,
}

/// Lines written by export tools above the actual table.
static BANNER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Spreadsheet separator hint, e.g. `sep=;`
        r"^(?i)sep=.$",
        // Ticketing export stamps, e.g. `Exported on 2024-03-01 by ...`
        r"^(?i)(report\s+)?(exported|generated)\b.*\b(on|at|by|from)\b",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> Result<String, CsvError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).to_string(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.to_string(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        "utf-16le" | "utf-16be" | "utf-16" => {
            let (text, _, had_errors) = encoding_rs::Encoding::for_label(encoding.as_bytes())
                .unwrap_or(encoding_rs::UTF_16LE)
                .decode(bytes);
            if had_errors {
                return Err(CsvError::EncodingError(format!("invalid {} sequence", encoding)));
            }
            text.to_string()
        }
        // Fallback: UTF-8 with lossy conversion
        _ => String::from_utf8_lossy(bytes).to_string(),
    };

    Ok(decoded)
}

/// Decode bytes with auto-detected encoding. Returns `(text, encoding)`.
pub fn decode_auto(bytes: &[u8]) -> Result<(String, String), CsvError> {
    let encoding = detect_encoding(bytes);
    let text = decode_content(bytes, &encoding)?;
    Ok((text, encoding))
}

/// Read and decode a file with auto-detected encoding.
pub fn read_file_auto<P: AsRef<Path>>(path: P) -> Result<(String, String), CsvError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_auto(&bytes)
}

/// Whether a line is a known export banner.
pub fn is_banner_line(line: &str) -> bool {
    let line = line.trim();
    BANNER_PATTERNS.iter().any(|re| re.is_match(line))
}

/// Whether a line has an id-like cell under any candidate separator.
fn has_id_like_cell(line: &str) -> bool {
    line.split(['\t', ',', ';'])
        .any(|cell| is_id_cell(cell.trim().trim_matches('"')))
}

/// Split a buffer into non-empty lines, dropping export banners.
///
/// Banners are only recognised above the first line with an id-like cell;
/// everything from there on is kept as data.
pub fn content_lines(content: &str) -> Vec<&str> {
    let mut in_table = false;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| {
            if in_table {
                return true;
            }
            if has_id_like_cell(line) {
                in_table = true;
                return true;
            }
            !is_banner_line(line)
        })
        .collect()
}

/// Detect the separator from the first non-empty lines.
///
/// Counts tabs, commas and semicolons per line and keeps the maximum of each
/// across the window. Tab wins ties, then comma, then semicolon; tab is the
/// default when none occur.
pub fn detect_separator(lines: &[&str]) -> char {
    let (mut tabs, mut commas, mut semicolons) = (0usize, 0usize, 0usize);

    for line in lines.iter().take(SEPARATOR_SAMPLE_LINES) {
        tabs = tabs.max(line.matches('\t').count());
        commas = commas.max(line.matches(',').count());
        semicolons = semicolons.max(line.matches(';').count());
    }

    if tabs > 0 && tabs >= commas && tabs >= semicolons {
        '\t'
    } else if commas > 0 && commas >= semicolons {
        ','
    } else if semicolons > 0 {
        ';'
    } else {
        '\t'
    }
}

/// Split one line into trimmed, quote-stripped cells.
pub fn split_cells(line: &str, separator: char) -> RawRow {
    line.split(separator)
        .map(|s| s.trim().trim_matches('"').trim().to_string())
        .collect()
}

/// Parse a decoded buffer into rows.
///
/// Returns an empty table for blank input; emptiness is the caller's call.
pub fn parse_table(content: &str) -> ParsedTable {
    let lines = content_lines(content);
    let separator = detect_separator(&lines);
    let rows = lines.iter().map(|line| split_cells(line, separator)).collect();

    ParsedTable { separator, rows }
}

/// Format separator for display
pub fn format_separator(sep: char) -> &'static str {
    match sep {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        _ => "?",
    }
}
