pub mod analysis_service;

pub use analysis_service::{
    AnalysisService, EditTargetAcosRequest, EditTargetAcosResponse, ExportRequest, ExportResponse,
    IngestRequest, IngestResponse,
};
