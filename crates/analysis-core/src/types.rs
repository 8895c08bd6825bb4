use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A daily OHLCV series augmented with derived indicator columns.
///
/// Each column is aligned index-for-index with `bars`. Entries are `None`
/// where the rolling window has not yet accumulated enough history; after
/// back-fill a column is either fully populated or (when the series is
/// shorter than the window) entirely `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentedSeries {
    pub bars: Vec<Bar>,
    pub ma50: Vec<Option<f64>>,
    pub ma200: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

impl AugmentedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Company profile fields as reported by the data provider.
///
/// Every numeric field is optional: providers routinely omit fundamentals
/// for ETFs, foreign listings and recent IPOs. Conversion to concrete
/// metric values (including the missing-means-zero defaulting) happens in
/// one place, the metric extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub long_name: Option<String>,
    pub long_business_summary: Option<String>,
    pub current_price: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub enterprise_to_ebitda: Option<f64>,
    pub current_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub gross_margins: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
}

/// One reporting period of a financial statement: period end date plus a
/// line-item -> value map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub end_date: Option<DateTime<Utc>>,
    pub items: BTreeMap<String, f64>,
}

/// The three standard financial statements. Fetched alongside the profile
/// and carried through the analysis result for display; scoring does not
/// read them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub balance_sheet: Vec<StatementPeriod>,
    pub income_statement: Vec<StatementPeriod>,
    pub cash_flow: Vec<StatementPeriod>,
}

/// Flat metric-name -> value mapping derived from the company profile.
///
/// The extractor guarantees total coverage of the fixed key set; a lookup
/// miss downstream is a programming error and surfaces as
/// [`AnalysisError::MissingMetric`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSet(BTreeMap<String, f64>);

impl MetricSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Result<f64, AnalysisError> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| AnalysisError::MissingMetric(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Result of scoring a metric set against the fixed heuristic battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u32,
    pub max_score: u32,
    pub reasons: Vec<String>,
    pub concerns: Vec<String>,
}
