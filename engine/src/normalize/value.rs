// Coercion of raw cells into canonical numbers and text.
//
// Every numeric coercion has a strict `try_*` form that reports why a cell was
// rejected, and a folding form that substitutes zero so a single bad cell
// never fails a row.
use shared::models::CellValue;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedCell {
    #[error("cell is empty")]
    Empty,
    #[error("'{0}' has no numeric content")]
    NotNumeric(String),
}

/// Parses the longest decimal prefix of `input` after leading whitespace,
/// the way spreadsheet front ends read "12.5abc" as 12.5.
pub fn parse_decimal_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - (end + 1);
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Drops currency symbols, thousands separators and other decoration,
/// keeping digits, `.` and `-`.
fn strip_decoration(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

pub fn try_number(raw: &CellValue) -> Result<f64, MalformedCell> {
    match raw {
        CellValue::Number(n) => Ok(*n),
        CellValue::Empty => Err(MalformedCell::Empty),
        CellValue::Text(text) if text.trim().is_empty() => Err(MalformedCell::Empty),
        CellValue::Text(text) => parse_decimal_prefix(&strip_decoration(text))
            .ok_or_else(|| MalformedCell::NotNumeric(text.clone())),
    }
}

/// `"$1,234.50"` -> `1234.5`; anything unparsable -> `0`.
pub fn to_number(raw: &CellValue) -> f64 {
    try_number(raw).unwrap_or(0.0)
}

/// Share cells are on a 0-100 scale with or without a `%` suffix.
pub fn try_percent_fraction(raw: &CellValue) -> Result<f64, MalformedCell> {
    match raw {
        CellValue::Number(n) => Ok(n / 100.0),
        CellValue::Empty => Err(MalformedCell::Empty),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(MalformedCell::Empty);
            }
            let bare = trimmed.strip_suffix('%').unwrap_or(trimmed);
            parse_decimal_prefix(bare)
                .map(|n| n / 100.0)
                .ok_or_else(|| MalformedCell::NotNumeric(text.clone()))
        }
    }
}

pub fn to_percent_fraction(raw: &CellValue) -> f64 {
    try_percent_fraction(raw).unwrap_or(0.0)
}

/// ACOS in percentage points: the parsed value times 100, whatever scale the
/// source used.
pub fn try_acos_points(raw: &CellValue) -> Result<f64, MalformedCell> {
    try_number(raw).map(|n| n * 100.0)
}

pub fn to_acos_points(raw: &CellValue) -> f64 {
    try_acos_points(raw).unwrap_or(0.0)
}

pub fn to_text(raw: &CellValue) -> String {
    match raw {
        CellValue::Empty => String::new(),
        CellValue::Text(text) => text.clone(),
        CellValue::Number(n) => n.to_string(),
    }
}
