// Fuzzy column resolution: export tools disagree on labels ("CPC", "Cost Per
// Click", "CPC (USD)"), so fields are located by normalized substring match.
use shared::models::{CellValue, RawRecord};

/// Lower-cases and drops everything outside `[a-z0-9]`.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Returns the value of the first column matching the highest-priority
/// candidate, or `None` when nothing matches.
///
/// Candidates are tried in the given order; for each one the record's labels
/// are scanned in column order and the first label whose normalized form
/// contains the normalized candidate wins. A candidate that normalizes to
/// nothing never matches.
pub fn resolve<'a>(record: &'a RawRecord, candidates: &[&str]) -> Option<&'a CellValue> {
    let labels: Vec<(String, &CellValue)> = record
        .columns()
        .map(|(label, value)| (normalize_label(label), value))
        .collect();

    candidates
        .iter()
        .map(|candidate| normalize_label(candidate))
        .filter(|candidate| !candidate.is_empty())
        .find_map(|candidate| {
            labels
                .iter()
                .find(|(label, _)| label.contains(&candidate))
                .map(|(_, value)| *value)
        })
}

/// Like [`resolve`] but yields [`CellValue::Empty`] for a missing column.
pub fn resolve_or_empty<'a>(record: &'a RawRecord, candidates: &[&str]) -> &'a CellValue {
    const EMPTY: &CellValue = &CellValue::Empty;
    resolve(record, candidates).unwrap_or(EMPTY)
}
