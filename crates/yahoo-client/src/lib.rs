use std::collections::BTreeMap;
use std::time::Duration;

use analysis_core::{
    AnalysisError, Bar, CompanyProfile, FinancialStatements, MarketDataProvider, StatementPeriod,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

const PROFILE_MODULES: &str = "price,summaryProfile,summaryDetail,defaultKeyStatistics,financialData";
const STATEMENT_MODULES: &str =
    "balanceSheetHistory,incomeStatementHistory,cashflowStatementHistory";

/// Client for Yahoo Finance's public chart and quoteSummary endpoints,
/// the same data yfinance exposes as `history()`, `info` and the three
/// statement attributes.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AnalysisError> {
        tracing::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AnalysisError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::Provider(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::Provider(e.to_string()))
    }

    /// One year of daily bars, ascending by date.
    pub async fn get_history(&self, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
        let url = format!("{}/v8/finance/chart/{}", BASE_URL, symbol);
        let response: ChartResponse = self
            .get_json(&url, &[("range", "1y"), ("interval", "1d")])
            .await?;

        bars_from_chart(response, symbol)
    }

    /// Company profile fields (name, summary, price, fundamentals).
    pub async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, AnalysisError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", BASE_URL, symbol);
        let response: QuoteSummaryResponse = self
            .get_json(&url, &[("modules", PROFILE_MODULES)])
            .await?;

        profile_from_summary(response, symbol)
    }

    /// The three standard financial statements, most recent period first.
    pub async fn get_statements(&self, symbol: &str) -> Result<FinancialStatements, AnalysisError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", BASE_URL, symbol);
        let response: QuoteSummaryResponse = self
            .get_json(&url, &[("modules", STATEMENT_MODULES)])
            .await?;

        Ok(statements_from_summary(response))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, AnalysisError> {
        YahooClient::get_profile(self, symbol).await
    }

    async fn get_history(&self, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
        YahooClient::get_history(self, symbol).await
    }

    async fn get_statements(&self, symbol: &str) -> Result<FinancialStatements, AnalysisError> {
        YahooClient::get_statements(self, symbol).await
    }
}

fn bars_from_chart(response: ChartResponse, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
    let result = response
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| AnalysisError::NotFound(symbol.to_string()))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::NotFound(symbol.to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        // Yahoo nulls out rows for half-days and suspensions; drop them the
        // way yfinance does.
        let (open, high, low, close) = match (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);

        let timestamp = DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| AnalysisError::Provider(format!("invalid timestamp {ts}")))?;

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    if bars.is_empty() {
        return Err(AnalysisError::NotFound(symbol.to_string()));
    }

    Ok(bars)
}

fn profile_from_summary(
    response: QuoteSummaryResponse,
    symbol: &str,
) -> Result<CompanyProfile, AnalysisError> {
    let result = response
        .quote_summary
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| AnalysisError::Provider(format!("no quote summary for {symbol}")))?;

    let price = result.price.unwrap_or_default();
    let summary_profile = result.summary_profile.unwrap_or_default();
    let summary_detail = result.summary_detail.unwrap_or_default();
    let key_stats = result.default_key_statistics.unwrap_or_default();
    let financial_data = result.financial_data.unwrap_or_default();

    Ok(CompanyProfile {
        symbol: symbol.to_string(),
        long_name: price.long_name,
        long_business_summary: summary_profile.long_business_summary,
        current_price: raw(financial_data.current_price),
        fifty_two_week_high: raw(summary_detail.fifty_two_week_high),
        fifty_two_week_low: raw(summary_detail.fifty_two_week_low),
        market_cap: raw(price.market_cap).or(raw(summary_detail.market_cap)),
        trailing_pe: raw(summary_detail.trailing_pe),
        forward_pe: raw(summary_detail.forward_pe),
        peg_ratio: raw(key_stats.peg_ratio),
        price_to_book: raw(key_stats.price_to_book),
        price_to_sales: raw(summary_detail.price_to_sales_trailing_12_months),
        enterprise_to_ebitda: raw(key_stats.enterprise_to_ebitda),
        current_ratio: raw(financial_data.current_ratio),
        debt_to_equity: raw(financial_data.debt_to_equity),
        quick_ratio: raw(financial_data.quick_ratio),
        return_on_equity: raw(financial_data.return_on_equity),
        return_on_assets: raw(financial_data.return_on_assets),
        profit_margins: raw(financial_data.profit_margins),
        operating_margins: raw(financial_data.operating_margins),
        gross_margins: raw(financial_data.gross_margins),
        revenue_growth: raw(financial_data.revenue_growth),
        earnings_growth: raw(financial_data.earnings_growth),
        dividend_yield: raw(summary_detail.dividend_yield),
        payout_ratio: raw(summary_detail.payout_ratio),
    })
}

fn statements_from_summary(response: QuoteSummaryResponse) -> FinancialStatements {
    let result = response
        .quote_summary
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) });

    let Some(result) = result else {
        return FinancialStatements::default();
    };

    FinancialStatements {
        balance_sheet: periods_from_history(result.balance_sheet_history, "balanceSheetStatements"),
        income_statement: periods_from_history(
            result.income_statement_history,
            "incomeStatementHistory",
        ),
        cash_flow: periods_from_history(result.cashflow_statement_history, "cashflowStatements"),
    }
}

/// Yahoo nests each statement list under a module-specific key, with every
/// line item wrapped as `{raw, fmt}`. Unwrap generically rather than naming
/// every line item.
fn periods_from_history(
    history: Option<serde_json::Value>,
    list_key: &str,
) -> Vec<StatementPeriod> {
    let Some(statements) = history
        .as_ref()
        .and_then(|h| h.get(list_key))
        .and_then(|v| v.as_array())
    else {
        return Vec::new();
    };

    statements
        .iter()
        .filter_map(|stmt| stmt.as_object())
        .map(|stmt| {
            let end_date = stmt
                .get("endDate")
                .and_then(|v| v.get("raw"))
                .and_then(|v| v.as_i64())
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

            let mut items = BTreeMap::new();
            for (name, value) in stmt {
                if name == "endDate" || name == "maxAge" {
                    continue;
                }
                if let Some(v) = value.get("raw").and_then(|v| v.as_f64()) {
                    items.insert(name.clone(), v);
                }
            }

            StatementPeriod { end_date, items }
        })
        .collect()
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

// --- Yahoo response envelopes ---

/// Yahoo wraps most numbers as `{"raw": 1.23, "fmt": "1.23"}`; `raw` is
/// absent when the field is unavailable.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryProfile")]
    summary_profile: Option<SummaryProfileModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "defaultKeyStatistics")]
    default_key_statistics: Option<KeyStatisticsModule>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialDataModule>,
    #[serde(rename = "balanceSheetHistory")]
    balance_sheet_history: Option<serde_json::Value>,
    #[serde(rename = "incomeStatementHistory")]
    income_statement_history: Option<serde_json::Value>,
    #[serde(rename = "cashflowStatementHistory")]
    cashflow_statement_history: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryProfileModule {
    #[serde(rename = "longBusinessSummary")]
    long_business_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "fiftyTwoWeekHigh")]
    fifty_two_week_high: Option<RawValue>,
    #[serde(rename = "fiftyTwoWeekLow")]
    fifty_two_week_low: Option<RawValue>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    #[serde(rename = "priceToSalesTrailing12Months")]
    price_to_sales_trailing_12_months: Option<RawValue>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
    #[serde(rename = "payoutRatio")]
    payout_ratio: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct KeyStatisticsModule {
    #[serde(rename = "pegRatio")]
    peg_ratio: Option<RawValue>,
    #[serde(rename = "priceToBook")]
    price_to_book: Option<RawValue>,
    #[serde(rename = "enterpriseToEbitda")]
    enterprise_to_ebitda: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "currentPrice")]
    current_price: Option<RawValue>,
    #[serde(rename = "currentRatio")]
    current_ratio: Option<RawValue>,
    #[serde(rename = "quickRatio")]
    quick_ratio: Option<RawValue>,
    #[serde(rename = "debtToEquity")]
    debt_to_equity: Option<RawValue>,
    #[serde(rename = "returnOnEquity")]
    return_on_equity: Option<RawValue>,
    #[serde(rename = "returnOnAssets")]
    return_on_assets: Option<RawValue>,
    #[serde(rename = "profitMargins")]
    profit_margins: Option<RawValue>,
    #[serde(rename = "operatingMargins")]
    operating_margins: Option<RawValue>,
    #[serde(rename = "grossMargins")]
    gross_margins: Option<RawValue>,
    #[serde(rename = "revenueGrowth")]
    revenue_growth: Option<RawValue>,
    #[serde(rename = "earningsGrowth")]
    earnings_growth: Option<RawValue>,
}
