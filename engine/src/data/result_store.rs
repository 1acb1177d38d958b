// Holds the current result set of each report. Owned by the service, never by
// the pure transforms; every ingestion swaps a whole set in.
use crate::analysis::bid::BidPolicy;
use crate::error::EngineError;
use shared::models::{BidRecord, BrandShareRecord, ReportKind};

pub struct ResultStore {
    bids: Vec<BidRecord>,
    brand_shares: Vec<BrandShareRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        ResultStore {
            bids: Vec::new(),
            brand_shares: Vec::new(),
        }
    }

    /// Drops the previous bid rows entirely; no merge.
    pub fn replace_bids(&mut self, records: Vec<BidRecord>) {
        self.bids = records;
    }

    pub fn replace_brand_shares(&mut self, records: Vec<BrandShareRecord>) {
        self.brand_shares = records;
    }

    pub fn clear(&mut self, report: ReportKind) {
        match report {
            ReportKind::PpcBid => self.bids.clear(),
            ReportKind::BrandShare => self.brand_shares.clear(),
        }
    }

    pub fn bids(&self) -> &[BidRecord] {
        &self.bids
    }

    pub fn brand_shares(&self) -> &[BrandShareRecord] {
        &self.brand_shares
    }

    pub fn len(&self, report: ReportKind) -> usize {
        match report {
            ReportKind::PpcBid => self.bids.len(),
            ReportKind::BrandShare => self.brand_shares.len(),
        }
    }

    pub fn is_empty(&self, report: ReportKind) -> bool {
        self.len(report) == 0
    }

    /// Retargets exactly one row and recomputes its max bid; other rows are untouched.
    pub fn set_target_acos(
        &mut self,
        id: &str,
        target_acos: f64,
        policy: &BidPolicy,
    ) -> Result<&BidRecord, EngineError> {
        let record = self
            .bids
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| EngineError::RecordNotFound(id.to_string()))?;
        record.retarget(target_acos, |cpc, acos, target| policy.derive(cpc, acos, target));
        Ok(record)
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}
