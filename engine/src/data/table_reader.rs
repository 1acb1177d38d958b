use crate::error::EngineError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use shared::models::{CellValue, FileKind, RawRecord};
use std::collections::HashMap;
use std::io::Cursor;

/// Label given to header cells that are blank, suffixed `_1`, `_2`, ... on repeats.
pub const EMPTY_LABEL: &str = "__EMPTY";

// Turns the bytes of an uploaded report into raw records. Reading stops at the
// first sheet of a workbook. Rows above `header_row` are skipped, the header
// row supplies the labels and every non-blank row below it becomes one record.
pub fn read_records(bytes: &[u8], kind: FileKind, header_row: usize) -> Result<Vec<RawRecord>, EngineError> {
    let grid = match kind {
        FileKind::DelimitedText => read_delimited_grid(bytes)?,
        FileKind::TabularBinary => read_workbook_grid(bytes)?,
    };
    Ok(records_from_grid(grid, header_row))
}

fn read_delimited_grid(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, EngineError> {
    let decoded = String::from_utf8_lossy(bytes);
    let text = decoded.strip_prefix('\u{feff}').unwrap_or(decoded.as_ref());

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut grid = Vec::new();
    for result in rdr.records() {
        let record = result?;
        grid.push(record.iter().map(infer_text_cell).collect());
    }
    Ok(grid)
}

// Plain numbers in delimited text are read as numbers, the way spreadsheet
// tools open a CSV; everything else stays text.
fn infer_text_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(raw.to_string()),
    }
}

fn read_workbook_grid(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, EngineError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Vec::new()),
    };
    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect())
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        // Excel serial number, no calendar conversion
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn header_labels(header: &[CellValue], width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    (0..width)
        .map(|col| {
            let base = match header.get(col) {
                Some(cell) if !cell.is_blank() => crate::normalize::value::to_text(cell),
                _ => EMPTY_LABEL.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let label = if *count == 0 { base } else { format!("{}_{}", base, count) };
            *count += 1;
            label
        })
        .collect()
}

fn records_from_grid(grid: Vec<Vec<CellValue>>, header_row: usize) -> Vec<RawRecord> {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut rows = grid.into_iter().skip(header_row);
    let labels = match rows.next() {
        Some(header) => header_labels(&header, width),
        None => return Vec::new(),
    };

    rows.filter_map(|row| {
        let mut cells = row.into_iter();
        let record: RawRecord = labels
            .iter()
            .map(|label| (label.clone(), cells.next().unwrap_or_default()))
            .collect();
        (!record.is_blank()).then_some(record)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn csv(content: &str, header_row: usize) -> Vec<RawRecord> {
        read_records(content.as_bytes(), FileKind::DelimitedText, header_row).unwrap()
    }

    #[test]
    fn test_read_csv_records() {
        let records = csv(
            "Keyword,Match Type,CPC,ACOS\nshoes,exact,$1.20,0.25\nboots,broad,0.8,\n",
            0,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Keyword"), Some(&CellValue::from("shoes")));
        assert_eq!(records[0].get("CPC"), Some(&CellValue::from("$1.20")));
        assert_eq!(records[0].get("ACOS"), Some(&CellValue::Number(0.25)));
        assert_eq!(records[1].get("CPC"), Some(&CellValue::Number(0.8)));
        assert_eq!(records[1].get("ACOS"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_header_row_offset_skips_banner() {
        let records = csv(
            "Brand View Report,,,\nSearch Query,Impressions: Brand Share %,Clicks: Brand Share %,Cart Adds: Brand Share %\nmat,10%,20,30\n",
            1,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Search Query"), Some(&CellValue::from("mat")));
        assert_eq!(records[0].get("Impressions: Brand Share %"), Some(&CellValue::from("10%")));
        assert_eq!(records[0].get("Clicks: Brand Share %"), Some(&CellValue::Number(20.0)));
    }

    #[test]
    fn test_blank_rows_skipped_and_short_rows_padded() {
        let records = csv("A,B,C\n1,2\n,,\n\n4,5,6\n", 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("C"), Some(&CellValue::Empty));
        assert_eq!(records[1].get("C"), Some(&CellValue::Number(6.0)));
    }

    #[test]
    fn test_blank_and_duplicate_labels() {
        let records = csv("Cost,,Cost,\na,b,c,d\n", 0);
        let labels: Vec<&str> = records[0].columns().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Cost", "__EMPTY", "Cost_1", "__EMPTY_1"]);
    }

    #[test]
    fn test_bom_is_stripped() {
        let records = csv("\u{feff}Keyword\nshoes\n", 0);
        assert_eq!(records[0].get("Keyword"), Some(&CellValue::from("shoes")));
    }

    #[test]
    fn test_header_only_and_empty_inputs() {
        assert!(csv("Keyword,CPC\n", 0).is_empty());
        assert!(csv("", 0).is_empty());
        assert!(csv("Keyword\nshoes\n", 5).is_empty());
    }

    #[test]
    fn test_read_workbook_records() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Keyword").unwrap();
        sheet.write_string(0, 1, "CPC (USD)").unwrap();
        sheet.write_string(0, 2, "Enabled").unwrap();
        sheet.write_string(1, 0, "shoes").unwrap();
        sheet.write_number(1, 1, 1.25).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let records = read_records(&bytes, FileKind::TabularBinary, 0).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Keyword"), Some(&CellValue::from("shoes")));
        assert_eq!(records[0].get("CPC (USD)"), Some(&CellValue::Number(1.25)));
        assert_eq!(records[0].get("Enabled"), Some(&CellValue::from("true")));
    }

    #[test]
    fn test_garbage_workbook_is_an_error() {
        let result = read_records(b"definitely not a workbook", FileKind::TabularBinary, 0);
        assert!(matches!(result, Err(EngineError::Spreadsheet(_))));
    }
}
