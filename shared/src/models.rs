use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell as handed over by the file-parsing layer, before any
/// column resolution or numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One input row: column labels exactly as they appear in the source file,
/// kept in the file's natural column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawRecord {
    cells: Vec<(String, CellValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((label.into(), value.into()));
    }

    /// Builder-style `push`, handy for fixtures.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(label, value);
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(label, value)| (label.as_str(), value))
    }

    /// Exact-label lookup.
    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| value)
    }

    /// A row with no non-blank cell at all.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_blank())
    }
}

impl<L: Into<String>, V: Into<CellValue>> FromIterator<(L, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(label, value)| (label.into(), value.into()))
                .collect(),
        }
    }
}

/// A PPC keyword row after normalization.
///
/// `new_max_bid` is only ever produced by the derivation function passed to
/// [`BidRecord::new`] or [`BidRecord::retarget`], so it can never drift from
/// `cpc`, `acos` and `target_acos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRecord {
    id: String,
    keyword: String,
    match_type: String,
    cpc: f64,
    acos: f64,
    roas: f64,
    target_acos: f64,
    new_max_bid: f64,
}

impl BidRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new<F>(
        id: impl Into<String>,
        keyword: impl Into<String>,
        match_type: impl Into<String>,
        cpc: f64,
        acos: f64,
        roas: f64,
        target_acos: f64,
        derive: F,
    ) -> Self
    where
        F: Fn(f64, f64, f64) -> f64,
    {
        Self {
            id: id.into(),
            keyword: keyword.into(),
            match_type: match_type.into(),
            cpc,
            acos,
            roas,
            target_acos,
            new_max_bid: derive(cpc, acos, target_acos),
        }
    }

    /// Sets a new target ACOS and recomputes the max bid in the same step.
    pub fn retarget<F>(&mut self, target_acos: f64, derive: F)
    where
        F: Fn(f64, f64, f64) -> f64,
    {
        self.target_acos = target_acos;
        self.new_max_bid = derive(self.cpc, self.acos, target_acos);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn match_type(&self) -> &str {
        &self.match_type
    }

    pub fn cpc(&self) -> f64 {
        self.cpc
    }

    /// Percentage points.
    pub fn acos(&self) -> f64 {
        self.acos
    }

    pub fn roas(&self) -> f64 {
        self.roas
    }

    /// Percentage points.
    pub fn target_acos(&self) -> f64 {
        self.target_acos
    }

    pub fn new_max_bid(&self) -> f64 {
        self.new_max_bid
    }
}

/// Brand share metrics for one search query. All shares are fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandShareRecord {
    pub search_query: String,
    pub impression_share: f64,
    pub click_share: f64,
    pub cart_add_share: f64,
}

/// How the source file has to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    DelimitedText,
    TabularBinary,
}

impl FileKind {
    /// `.csv` is read as text, anything else as a binary workbook.
    pub fn from_file_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".csv") {
            FileKind::DelimitedText
        } else {
            FileKind::TabularBinary
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    PpcBid,
    BrandShare,
}

impl ReportKind {
    /// Slug used in export file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::PpcBid => "ppc-bid",
            ReportKind::BrandShare => "brand-share",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
