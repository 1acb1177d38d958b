use crate::error::EngineError;
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};
use shared::models::{BidRecord, BrandShareRecord, ExportFormat, ReportKind};
use shared::utils::{format_amount, format_percentage, format_percentage_points};

/// One output column: header text and its width in character units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportColumn {
    pub header: &'static str,
    pub width: f64,
}

const fn column(header: &'static str, width: f64) -> ExportColumn {
    ExportColumn { header, width }
}

/// A canonical record that knows its fixed export layout.
pub trait ExportTable {
    const REPORT: ReportKind;
    const SHEET_NAME: &'static str;
    const COLUMNS: &'static [ExportColumn];

    /// Display strings, one per entry of `COLUMNS`.
    fn cells(&self) -> Vec<String>;
}

impl ExportTable for BrandShareRecord {
    const REPORT: ReportKind = ReportKind::BrandShare;
    const SHEET_NAME: &'static str = "Brand Share Analysis";
    const COLUMNS: &'static [ExportColumn] = &[
        column("Search Query", 40.0),
        column("Impressions: Brand Share %", 20.0),
        column("Clicks: Brand Share %", 20.0),
        column("Cart Adds: Brand Share %", 20.0),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.search_query.clone(),
            format_percentage(self.impression_share),
            format_percentage(self.click_share),
            format_percentage(self.cart_add_share),
        ]
    }
}

impl ExportTable for BidRecord {
    const REPORT: ReportKind = ReportKind::PpcBid;
    const SHEET_NAME: &'static str = "PPC Bid Analysis";
    const COLUMNS: &'static [ExportColumn] = &[
        column("Keyword", 40.0),
        column("Match Type", 15.0),
        column("CPC (USD)", 12.0),
        column("ACOS (%)", 12.0),
        column("ROAS", 10.0),
        column("Target ACOS (%)", 16.0),
        column("New Max Bid ($)", 16.0),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.keyword().to_string(),
            self.match_type().to_string(),
            format_amount(self.cpc()),
            format_percentage_points(self.acos()),
            format_amount(self.roas()),
            format_percentage_points(self.target_acos()),
            format_amount(self.new_max_bid()),
        ]
    }
}

/// Renders records in the given format. An empty slice yields headers only.
pub fn serialize<T: ExportTable>(records: &[T], format: ExportFormat) -> Result<Vec<u8>, EngineError> {
    match format {
        ExportFormat::Csv => serialize_csv(records),
        ExportFormat::Xlsx => serialize_xlsx(records),
    }
}

fn serialize_csv<T: ExportTable>(records: &[T]) -> Result<Vec<u8>, EngineError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(T::COLUMNS.iter().map(|c| c.header))?;
    for record in records {
        writer.write_record(record.cells())?;
    }
    writer.into_inner().map_err(|e| EngineError::from(e.into_error()))
}

fn serialize_xlsx<T: ExportTable>(records: &[T]) -> Result<Vec<u8>, EngineError> {
    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(T::SHEET_NAME)?;

    for (col, spec) in T::COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, spec.width)?;
        sheet.write_string_with_format(0, col, spec.header, &header_fmt)?;
    }
    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, text) in record.cells().iter().enumerate() {
            sheet.write_string(row, col as u16, text)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// `<report>-analysis-<ISO 8601 timestamp, ':' and '.' replaced by '-'>.<ext>`
pub fn export_filename(report: ReportKind, format: ExportFormat, now: DateTime<Utc>) -> String {
    let timestamp = now
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    format!("{}-analysis-{}.{}", report.slug(), timestamp, format.extension())
}
