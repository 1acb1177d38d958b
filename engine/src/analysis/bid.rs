// Recommended max bid derivation for PPC keywords.
use super::ReportAnalyzer;
use crate::normalize::transform::transform_bid;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{BidRecord, RawRecord, ReportKind};

/// Thresholds of the max bid formula. ACOS values are in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidPolicy {
    /// Below `raise_threshold * target` the keyword is under-spending.
    pub raise_threshold: f64,
    pub raise_multiplier: f64,
}

impl Default for BidPolicy {
    fn default() -> Self {
        Self {
            raise_threshold: 0.84,
            raise_multiplier: 1.2,
        }
    }
}

impl BidPolicy {
    /// Raises the bid flat when ACOS is comfortably under target, otherwise
    /// scales CPC by `target / acos`. With no ACOS to scale by, the current
    /// CPC is kept.
    pub fn derive(&self, cpc: f64, acos: f64, target_acos: f64) -> f64 {
        if acos < self.raise_threshold * target_acos {
            cpc * self.raise_multiplier
        } else if acos == 0.0 {
            cpc
        } else {
            (cpc / acos) * target_acos
        }
    }
}

/// [`BidPolicy::derive`] with the default thresholds.
pub fn derive_new_max_bid(cpc: f64, acos: f64, target_acos: f64) -> f64 {
    BidPolicy::default().derive(cpc, acos, target_acos)
}

pub struct PpcOptimizer {
    name: String,
    policy: BidPolicy,
    default_target_acos: f64,
}

impl PpcOptimizer {
    pub fn new(policy: BidPolicy, default_target_acos: f64) -> Self {
        Self {
            name: format!("PPC({})", default_target_acos),
            policy,
            default_target_acos,
        }
    }
}

impl ReportAnalyzer for PpcOptimizer {
    type Output = BidRecord;

    fn name(&self) -> &str {
        &self.name
    }

    fn report(&self) -> ReportKind {
        ReportKind::PpcBid
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "default_target_acos": self.default_target_acos,
            "raise_threshold": self.policy.raise_threshold,
            "raise_multiplier": self.policy.raise_multiplier,
        })
    }

    fn analyze(&self, rows: &[RawRecord]) -> Vec<BidRecord> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| transform_bid(row, idx, self.default_target_acos, &self.policy))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_raise_branch() {
        // 20 < 0.84 * 30 = 25.2
        assert_close(derive_new_max_bid(10.0, 20.0, 30.0), 12.0);
    }

    #[test]
    fn test_scale_branch() {
        // 40 >= 25.2
        assert_close(derive_new_max_bid(10.0, 40.0, 30.0), 7.5);
    }

    #[test]
    fn test_threshold_boundary_takes_scale_branch() {
        let policy = BidPolicy { raise_threshold: 0.5, raise_multiplier: 1.2 };
        // 15 == 0.5 * 30 is not strictly below the threshold
        assert_close(policy.derive(3.0, 15.0, 30.0), 6.0);
    }

    #[test]
    fn test_monotonic_in_target_within_scale_branch() {
        let mut previous = f64::NEG_INFINITY;
        for target in [5.0, 10.0, 20.0, 30.0, 40.0, 47.0] {
            // acos 40 stays >= 0.84 * target for all of these
            let bid = derive_new_max_bid(2.0, 40.0, target);
            assert!(bid >= previous, "bid decreased at target {}", target);
            previous = bid;
        }
    }

    #[test]
    fn test_zero_target() {
        // Only a negative acos takes the raise branch when target is 0
        assert_close(derive_new_max_bid(1.0, -5.0, 0.0), 1.2);
        assert_close(derive_new_max_bid(1.0, 25.0, 0.0), 0.0);
    }

    #[test]
    fn test_zero_acos_is_guarded() {
        // Raise branch whenever target is positive
        assert_close(derive_new_max_bid(2.0, 0.0, 30.0), 2.4);
        // Nothing to scale by: hold the current CPC instead of dividing by zero
        let bid = derive_new_max_bid(2.0, 0.0, 0.0);
        assert!(bid.is_finite());
        assert_close(bid, 2.0);
    }

    #[test]
    fn test_optimizer_preserves_row_order() {
        let rows = vec![
            RawRecord::new().with("Keyword", "b").with("CPC", 1.0).with("ACOS", 0.5),
            RawRecord::new().with("Keyword", "a").with("CPC", 2.0).with("ACOS", 0.1),
        ];
        let optimizer = PpcOptimizer::new(BidPolicy::default(), 30.0);
        let records = optimizer.analyze(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), "row-0");
        assert_eq!(records[0].keyword(), "b");
        assert_eq!(records[1].keyword(), "a");
        // acos 10 < 25.2
        assert_close(records[1].new_max_bid(), 2.4);
        assert_eq!(optimizer.parameters()["default_target_acos"], 30.0);
        assert_eq!(optimizer.report(), ReportKind::PpcBid);
    }
}
