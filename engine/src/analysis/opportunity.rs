// Brand share opportunity detection.
use super::ReportAnalyzer;
use crate::normalize::transform::try_brand_share;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{BrandShareRecord, RawRecord, ReportKind};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityRule {
    /// Queries at or above this impression share are treated as saturated.
    pub impression_ceiling: f64,
}

impl Default for OpportunityRule {
    fn default() -> Self {
        Self { impression_ceiling: 0.8 }
    }
}

impl OpportunityRule {
    /// The brand converts to cart better than it is shown or clicked.
    pub fn matches(&self, r: &BrandShareRecord) -> bool {
        r.impression_share < r.cart_add_share
            && r.click_share < r.cart_add_share
            && r.impression_share < self.impression_ceiling
    }
}

pub fn is_opportunity(r: &BrandShareRecord) -> bool {
    OpportunityRule::default().matches(r)
}

pub struct BrandShareAnalyzer {
    rule: OpportunityRule,
}

impl BrandShareAnalyzer {
    pub fn new(rule: OpportunityRule) -> Self {
        Self { rule }
    }
}

impl ReportAnalyzer for BrandShareAnalyzer {
    type Output = BrandShareRecord;

    fn name(&self) -> &str {
        "BrandShareOpportunities"
    }

    fn report(&self) -> ReportKind {
        ReportKind::BrandShare
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "impression_ceiling": self.rule.impression_ceiling })
    }

    fn analyze(&self, rows: &[RawRecord]) -> Vec<BrandShareRecord> {
        rows.iter()
            .enumerate()
            .filter_map(|(idx, row)| match try_brand_share(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(row = idx, error = %e, "Skipping brand share row with unreadable shares");
                    None
                }
            })
            .filter(|record| self.rule.matches(record))
            .collect()
    }
}
