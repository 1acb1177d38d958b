// Handler for ingest: drop the report's current result set, read the file, then
// transform every row in one pass. A failed ingest leaves the set empty.
use std::sync::Arc;
use tokio::sync::RwLock;

use super::IngestRequest;
use crate::analysis::bid::PpcOptimizer;
use crate::analysis::opportunity::BrandShareAnalyzer;
use crate::analysis::ReportAnalyzer;
use crate::config::settings::EngineSettings;
use crate::data::result_store::ResultStore;
use crate::data::table_reader;
use crate::error::{EngineError, Notice};
use shared::models::{FileKind, ReportKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub rows_read: usize,
    pub records: usize,
}

pub async fn handle_ingest(
    req_payload: &IngestRequest,
    settings: &EngineSettings,
    store: Arc<RwLock<ResultStore>>,
) -> Result<IngestSummary, EngineError> {
    store.write().await.clear(req_payload.report);

    let path = &req_payload.path;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| EngineError::UnreadableFile { path: path.clone(), source })?;

    let kind = FileKind::from_file_name(&path.to_string_lossy());
    let header_row = match req_payload.report {
        ReportKind::PpcBid => settings.ppc_header_row,
        ReportKind::BrandShare => settings.brand_header_row,
    };
    let rows = table_reader::read_records(&bytes, kind, header_row)?;
    if rows.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    tracing::debug!(rows = rows.len(), ?kind, "Parsed raw records");

    let rows_read = rows.len();
    let records = match req_payload.report {
        ReportKind::PpcBid => {
            let analyzer = PpcOptimizer::new(settings.bid_policy, settings.default_target_acos);
            let records = analyzer.analyze(&rows);
            let count = records.len();
            store.write().await.replace_bids(records);
            tracing::info!(analyzer = analyzer.name(), parameters = %analyzer.parameters(), count, "Stored bid rows");
            count
        }
        ReportKind::BrandShare => {
            let analyzer = BrandShareAnalyzer::new(settings.opportunity);
            let records = analyzer.analyze(&rows);
            let count = records.len();
            store.write().await.replace_brand_shares(records);
            tracing::info!(analyzer = analyzer.name(), parameters = %analyzer.parameters(), count, "Stored brand share opportunities");
            count
        }
    };

    Ok(IngestSummary { rows_read, records })
}

pub fn success_notice(report: ReportKind, summary: &IngestSummary) -> Notice {
    let description = match report {
        ReportKind::PpcBid => format!("Loaded {} rows of data", summary.records),
        ReportKind::BrandShare => format!(
            "Found {} opportunities for brand share improvement",
            summary.records
        ),
    };
    Notice::success("File loaded successfully", description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::Builder;

    #[tokio::test]
    async fn test_ingest_workbook_bids() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Targeting", "Match Type", "Cost Per Click (CPC)", "ACOS"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_string(1, 0, "trail shoes").unwrap();
        sheet.write_string(1, 1, "BROAD").unwrap();
        sheet.write_number(1, 2, 0.5).unwrap();
        sheet.write_number(1, 3, 0.1).unwrap();
        let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        workbook.save(file.path()).unwrap();

        let store = Arc::new(RwLock::new(ResultStore::new()));
        let request = IngestRequest { path: file.path().to_path_buf(), report: ReportKind::PpcBid };
        let summary = handle_ingest(&request, &EngineSettings::default(), store.clone()).await.unwrap();
        assert_eq!(summary, IngestSummary { rows_read: 1, records: 1 });

        let store = store.read().await;
        let record = &store.bids()[0];
        assert_eq!(record.keyword(), "trail shoes");
        // acos 10 < 25.2: 0.5 * 1.2
        assert!((record.new_max_bid() - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_ingest_unreadable_workbook() {
        let mut file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"not a zip").unwrap();
        let store = Arc::new(RwLock::new(ResultStore::new()));
        let request = IngestRequest { path: file.path().to_path_buf(), report: ReportKind::PpcBid };
        let result = handle_ingest(&request, &EngineSettings::default(), store).await;
        assert!(matches!(result, Err(EngineError::Spreadsheet(_))));
    }

    #[test]
    fn test_success_notice_wording() {
        let summary = IngestSummary { rows_read: 10, records: 4 };
        assert_eq!(success_notice(ReportKind::PpcBid, &summary).description, "Loaded 4 rows of data");
        assert_eq!(
            success_notice(ReportKind::BrandShare, &summary).description,
            "Found 4 opportunities for brand share improvement"
        );
    }
}
