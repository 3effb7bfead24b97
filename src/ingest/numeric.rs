//! Tolerant numeric, percent, and date parsing
//!
//! Status snapshots arrive pasted from spreadsheets and slide decks, so the
//! parsers here accept both `1,234.56` and `1.234,56` conventions, stray `%`
//! signs, and the date formats operators actually type. All parsers return
//! `Option`; an unreadable value is treated as "not reported", never an
//! error.

use chrono::NaiveDate;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Accent-fold, lowercase, and trim a string for matching.
///
/// NFD-decomposes and drops combining marks, so `Excelência` and
/// `excelencia` compare equal. Used for label and keyword matching
/// throughout ingestion and analysis.
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Parse a number tolerating spreadsheet formatting.
///
/// Strips spaces and `%`. When both `.` and `,` are present the `.` is
/// taken as a thousands separator and `,` as the decimal mark
/// (`1.234,56` → 1234.56). A lone `,` is a decimal mark (`0,95` → 0.95).
pub fn parse_number(s: &str) -> Option<f64> {
    let mut s = s.trim().replace(' ', "").replace('%', "");
    if s.contains(',') && s.contains('.') {
        s = s.replace('.', "").replace(',', ".");
    } else if s.contains(',') {
        s = s.replace(',', ".");
    }
    s.parse().ok()
}

/// Parse a percentage value, with or without a trailing `%`.
pub fn parse_percent(s: &str) -> Option<f64> {
    parse_number(s.trim().trim_end_matches('%'))
}

/// Parse a date in `YYYY-MM-DD`, `DD/MM/YYYY`, or `DD-MM-YYYY` format.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// `parse_number` over an optional raw string.
pub fn opt_number(s: Option<&str>) -> Option<f64> {
    s.and_then(parse_number)
}

/// `parse_percent` over an optional raw string.
pub fn opt_percent(s: Option<&str>) -> Option<f64> {
    s.and_then(parse_percent)
}
