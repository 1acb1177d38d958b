// Handler for per-row target ACOS edits
use std::sync::Arc;
use tokio::sync::RwLock;

use super::EditTargetAcosRequest;
use crate::analysis::bid::BidPolicy;
use crate::data::result_store::ResultStore;
use crate::error::EngineError;
use crate::normalize::value::parse_decimal_prefix;
use shared::models::BidRecord;

pub async fn handle_edit_target_acos(
    req_payload: &EditTargetAcosRequest,
    policy: &BidPolicy,
    store: Arc<RwLock<ResultStore>>,
) -> Result<BidRecord, EngineError> {
    let target_acos = parse_decimal_prefix(&req_payload.value)
        .filter(|v| v.is_finite())
        .ok_or_else(|| EngineError::InvalidNumber(req_payload.value.clone()))?;

    let mut store = store.write().await;
    let record = store.set_target_acos(&req_payload.id, target_acos, policy)?;
    tracing::debug!(
        id = %record.id(),
        target_acos,
        new_max_bid = record.new_max_bid(),
        "Recomputed max bid"
    );
    Ok(record.clone())
}
