// Report analyzers: turn a batch of raw rows into a canonical result set.
pub mod bid;
pub mod opportunity;

use serde_json::Value;
use shared::models::{RawRecord, ReportKind};

// Common trait for both report types
pub trait ReportAnalyzer: Send + Sync {
    type Output;

    fn name(&self) -> &str;
    fn report(&self) -> ReportKind;
    fn parameters(&self) -> Value; // Parameters this analyzer instance was built with
    fn analyze(&self, rows: &[RawRecord]) -> Vec<Self::Output>; // One pass, input order preserved
}
