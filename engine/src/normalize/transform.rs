// Raw record -> canonical record, combining column resolution and value
// normalization. Both transforms are total: unresolved or malformed fields
// degrade to zero / empty text.
use super::resolver::{resolve, resolve_or_empty};
use super::value::{self, MalformedCell};
use crate::analysis::bid::BidPolicy;
use shared::models::{BidRecord, BrandShareRecord, CellValue, RawRecord};
use tracing::debug;

/// Column name candidates, highest priority first.
pub mod columns {
    pub const CPC: &[&str] = &["cpc", "cost per click", "costperclick", "cost"];
    pub const ACOS: &[&str] = &["acos", "advertising cost of sale", "cost of sale"];
    pub const ROAS: &[&str] = &["roas", "return on ad spend", "return on spend"];
    pub const KEYWORD: &[&str] = &["keyword", "targeting", "search term", "searchterm"];
    pub const MATCH_TYPE: &[&str] = &["match type", "matchtype", "targeting type", "targetingtype"];

    pub const SEARCH_QUERY: &[&str] = &["search query", "searchterm"];
    pub const IMPRESSION_SHARE: &[&str] = &["impressions brand share", "impression share"];
    pub const CLICK_SHARE: &[&str] = &["clicks brand share", "click share"];
    pub const CART_ADD_SHARE: &[&str] = &["cart adds brand share", "cart add share"];
}

/// Stable within one ingestion only.
pub fn row_id(row_index: usize) -> String {
    format!("row-{}", row_index)
}

fn folded<F>(raw: &RawRecord, candidates: &[&str], field: &str, row_index: usize, parse: F) -> f64
where
    F: Fn(&CellValue) -> Result<f64, MalformedCell>,
{
    match parse(resolve_or_empty(raw, candidates)) {
        Ok(n) => n,
        Err(e) => {
            debug!(row = row_index, field, error = %e, "Defaulting malformed cell to zero");
            0.0
        }
    }
}

pub fn transform_bid(
    raw: &RawRecord,
    row_index: usize,
    default_target_acos: f64,
    policy: &BidPolicy,
) -> BidRecord {
    let cpc = folded(raw, columns::CPC, "cpc", row_index, value::try_number);
    let acos = folded(raw, columns::ACOS, "acos", row_index, value::try_acos_points);
    let roas = folded(raw, columns::ROAS, "roas", row_index, value::try_number);

    BidRecord::new(
        row_id(row_index),
        value::to_text(resolve_or_empty(raw, columns::KEYWORD)),
        value::to_text(resolve_or_empty(raw, columns::MATCH_TYPE)),
        cpc,
        acos,
        roas,
        default_target_acos,
        |cpc, acos, target| policy.derive(cpc, acos, target),
    )
}

/// Strict form: fails on the first share cell that is missing or unparsable.
pub fn try_brand_share(raw: &RawRecord) -> Result<BrandShareRecord, MalformedCell> {
    let share = |candidates: &[&str]| {
        resolve(raw, candidates)
            .ok_or(MalformedCell::Empty)
            .and_then(value::try_percent_fraction)
    };
    Ok(BrandShareRecord {
        search_query: value::to_text(resolve_or_empty(raw, columns::SEARCH_QUERY)),
        impression_share: share(columns::IMPRESSION_SHARE)?,
        click_share: share(columns::CLICK_SHARE)?,
        cart_add_share: share(columns::CART_ADD_SHARE)?,
    })
}

pub fn transform_brand_share(raw: &RawRecord) -> BrandShareRecord {
    BrandShareRecord {
        search_query: value::to_text(resolve_or_empty(raw, columns::SEARCH_QUERY)),
        impression_share: value::to_percent_fraction(resolve_or_empty(raw, columns::IMPRESSION_SHARE)),
        click_share: value::to_percent_fraction(resolve_or_empty(raw, columns::CLICK_SHARE)),
        cart_add_share: value::to_percent_fraction(resolve_or_empty(raw, columns::CART_ADD_SHARE)),
    }
}
