// engine/src/services/analysis_service/mod.rs
// AnalysisService owns the shared result store and dispatches the three user
// operations to their handlers. Handler failures never escape: each one is
// turned into an error notice and the service stays usable.

use crate::config::settings::EngineSettings;
use crate::data::result_store::ResultStore;
use crate::error::Notice;
use chrono::Utc;
use serde::Serialize;
use shared::models::{BidRecord, ExportFormat, ReportKind};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod edit_target_acos;
pub mod export_results;
pub mod ingest;

#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub path: PathBuf,
    pub report: ReportKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub notice: Notice,
    pub rows_read: usize,
    pub records: usize,
}

#[derive(Debug, Clone)]
pub struct EditTargetAcosRequest {
    pub id: String,
    /// Raw user input; parsed leniently.
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditTargetAcosResponse {
    pub notice: Notice,
    pub record: Option<BidRecord>,
}

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub report: ReportKind,
    pub format: ExportFormat,
    /// Falls back to the configured export directory.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub notice: Notice,
    pub path: Option<PathBuf>,
}

pub struct AnalysisService {
    store: Arc<RwLock<ResultStore>>,
    settings: Arc<EngineSettings>,
}

impl AnalysisService {
    pub fn new(store: Arc<RwLock<ResultStore>>, settings: Arc<EngineSettings>) -> Self {
        AnalysisService { store, settings }
    }

    pub fn store(&self) -> Arc<RwLock<ResultStore>> {
        self.store.clone()
    }

    pub async fn ingest(&self, request: IngestRequest) -> IngestResponse {
        tracing::info!(
            report = %request.report,
            path = %request.path.display(),
            "Received ingest request, dispatching to handler."
        );
        match ingest::handle_ingest(&request, &self.settings, self.store.clone()).await {
            Ok(summary) => IngestResponse {
                notice: ingest::success_notice(request.report, &summary),
                rows_read: summary.rows_read,
                records: summary.records,
            },
            Err(e) => {
                tracing::error!(report = %request.report, error = %e, "Ingest failed");
                IngestResponse {
                    notice: Notice::from(&e),
                    rows_read: 0,
                    records: 0,
                }
            }
        }
    }

    pub async fn edit_target_acos(&self, request: EditTargetAcosRequest) -> EditTargetAcosResponse {
        tracing::info!(
            id = %request.id,
            value = %request.value,
            "Received target ACOS edit, dispatching to handler."
        );
        match edit_target_acos::handle_edit_target_acos(&request, &self.settings.bid_policy, self.store.clone()).await {
            Ok(record) => EditTargetAcosResponse {
                notice: Notice::success(
                    "Target ACOS updated",
                    format!(
                        "{}: new max bid ${}",
                        record.keyword(),
                        shared::utils::format_amount(record.new_max_bid())
                    ),
                ),
                record: Some(record),
            },
            Err(e) => EditTargetAcosResponse {
                notice: Notice::from(&e),
                record: None,
            },
        }
    }

    pub async fn export(&self, request: ExportRequest) -> ExportResponse {
        tracing::info!(
            report = %request.report,
            format = %request.format,
            "Received export request, dispatching to handler."
        );
        let dir = request
            .dir
            .clone()
            .unwrap_or_else(|| self.settings.export_dir.clone());
        match export_results::handle_export(&request, &dir, self.store.clone(), Utc::now()).await {
            Ok(path) => ExportResponse {
                notice: Notice::success(
                    "Export successful",
                    format!("Data exported as {} file", request.format),
                ),
                path: Some(path),
            },
            Err(e) => ExportResponse {
                notice: Notice::from(&e),
                path: None,
            },
        }
    }
}
