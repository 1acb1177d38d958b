// Handler for export: serialize in memory, then write the file asynchronously.
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ExportRequest;
use crate::data::result_store::ResultStore;
use crate::error::EngineError;
use crate::export::{export_filename, serialize, ExportTable};
use chrono::{DateTime, Utc};
use shared::models::{ExportFormat, ReportKind};

fn encode<T: ExportTable>(records: &[T], format: ExportFormat) -> Result<Vec<u8>, EngineError> {
    if records.is_empty() {
        return Err(EngineError::NothingToExport(T::REPORT));
    }
    serialize(records, format)
}

pub async fn handle_export(
    req_payload: &ExportRequest,
    dir: &Path,
    store: Arc<RwLock<ResultStore>>,
    now: DateTime<Utc>,
) -> Result<PathBuf, EngineError> {
    let bytes = {
        let store = store.read().await;
        match req_payload.report {
            ReportKind::PpcBid => encode(store.bids(), req_payload.format)?,
            ReportKind::BrandShare => encode(store.brand_shares(), req_payload.format)?,
        }
    };

    let path = dir.join(export_filename(req_payload.report, req_payload.format, now));
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");
    Ok(path)
}
