//! Ties the pipeline together: acquisition, indicator derivation, metric
//! extraction, scoring and chart rendering, run strictly in sequence per
//! request. Nothing is cached or shared between requests.

use std::path::PathBuf;

use analysis_core::{
    AnalysisError, AugmentedSeries, CompanyProfile, Evaluation, FinancialStatements,
    MarketDataProvider, MetricSet,
};
use chart_renderer::render_chart;
use chrono::Utc;
use fundamental_analysis::{evaluate, extract_metrics};
use technical_analysis::augment;

/// Everything `analyze` produces for one ticker.
#[derive(Debug)]
pub struct StockAnalysis {
    pub symbol: String,
    pub profile: CompanyProfile,
    pub series: AugmentedSeries,
    pub statements: FinancialStatements,
    pub metrics: MetricSet,
    pub evaluation: Evaluation,
    pub chart_path: PathBuf,
}

pub struct Dashboard<P> {
    provider: P,
    chart_dir: PathBuf,
}

impl<P: MarketDataProvider> Dashboard<P> {
    pub fn new(provider: P) -> Self {
        let chart_dir = std::env::var("DASHBOARD_CHART_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        Self {
            provider,
            chart_dir,
        }
    }

    pub fn with_chart_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chart_dir = dir.into();
        self
    }

    /// Analyze one ticker end to end.
    ///
    /// History is fetched first: a ticker with no historical data fails with
    /// `NotFound` before any derivation runs. Any other provider failure is
    /// logged with the original error text and re-propagated. No retries;
    /// every failure is terminal for this request.
    pub async fn analyze(&self, ticker: &str) -> Result<StockAnalysis, AnalysisError> {
        let symbol = ticker.trim().to_uppercase();
        tracing::info!("Analyzing {symbol}");

        let bars = self
            .provider
            .get_history(&symbol)
            .await
            .inspect_err(|e| log_provider_error(&symbol, e))?;
        tracing::debug!("Fetched {} bars for {symbol}", bars.len());

        let profile = self
            .provider
            .get_profile(&symbol)
            .await
            .inspect_err(|e| log_provider_error(&symbol, e))?;
        let statements = self
            .provider
            .get_statements(&symbol)
            .await
            .inspect_err(|e| log_provider_error(&symbol, e))?;

        let series = augment(bars)?;
        let metrics = extract_metrics(&profile, &statements);
        let evaluation = evaluate(&metrics)?;

        let chart_path = self
            .chart_dir
            .join(format!("{}_{}.png", symbol, Utc::now().timestamp()));
        render_chart(&symbol, &series, &chart_path)?;
        tracing::info!(
            "{symbol}: score {}/{}, chart at {}",
            evaluation.score,
            evaluation.max_score,
            chart_path.display()
        );

        Ok(StockAnalysis {
            symbol,
            profile,
            series,
            statements,
            metrics,
            evaluation,
            chart_path,
        })
    }
}

fn log_provider_error(symbol: &str, err: &AnalysisError) {
    // NotFound is surfaced verbatim; only genuine provider failures get the
    // user-facing fetch-error message.
    if let AnalysisError::Provider(msg) = err {
        tracing::error!("Error fetching data for {symbol}: {msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Bar;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct MockProvider {
        bars: Vec<Bar>,
        profile: CompanyProfile,
        profile_requested: AtomicBool,
    }

    impl MockProvider {
        fn new(bars: Vec<Bar>, profile: CompanyProfile) -> Self {
            Self {
                bars,
                profile,
                profile_requested: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn get_profile(&self, _symbol: &str) -> Result<CompanyProfile, AnalysisError> {
            self.profile_requested.store(true, Ordering::SeqCst);
            Ok(self.profile.clone())
        }

        async fn get_history(&self, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
            if self.bars.is_empty() {
                return Err(AnalysisError::NotFound(symbol.to_string()));
            }
            Ok(self.bars.clone())
        }

        async fn get_statements(
            &self,
            _symbol: &str,
        ) -> Result<FinancialStatements, AnalysisError> {
            Ok(FinancialStatements::default())
        }
    }

    fn year_of_bars() -> Vec<Bar> {
        (0..252)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.25).sin() * 6.0 + i as f64 * 0.08;
                Bar {
                    timestamp: Utc::now() - chrono::Duration::days((252 - i) as i64),
                    open: close - 0.5,
                    high: close + 1.2,
                    low: close - 1.2,
                    close,
                    volume: 1_500_000.0,
                }
            })
            .collect()
    }

    fn solid_profile() -> CompanyProfile {
        CompanyProfile {
            symbol: "TEST".to_string(),
            long_name: Some("Test Corp".to_string()),
            current_price: Some(120.0),
            market_cap: Some(50_000_000_000.0),
            trailing_pe: Some(20.0),
            peg_ratio: Some(1.2),
            price_to_book: Some(2.0),
            enterprise_to_ebitda: Some(10.0),
            current_ratio: Some(2.0),
            debt_to_equity: Some(0.5),
            return_on_equity: Some(0.2),
            return_on_assets: Some(0.1),
            operating_margins: Some(0.2),
            revenue_growth: Some(0.15),
            earnings_growth: Some(0.12),
            dividend_yield: Some(0.03),
            payout_ratio: Some(0.5),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn analyze_runs_the_whole_pipeline() {
        let provider = MockProvider::new(year_of_bars(), solid_profile());
        let dashboard = Dashboard::new(provider).with_chart_dir(std::env::temp_dir());

        let analysis = dashboard.analyze("test").await.unwrap();

        // Ticker is upper-cased at the boundary
        assert_eq!(analysis.symbol, "TEST");
        assert_eq!(analysis.evaluation.score, 12);
        assert!(analysis.series.rsi.iter().all(|v| v.is_some()));
        assert!(analysis.chart_path.exists());
        std::fs::remove_file(&analysis.chart_path).ok();
    }

    #[tokio::test]
    async fn missing_history_fails_before_profile_fetch() {
        let provider = MockProvider::new(vec![], solid_profile());
        let dashboard = Dashboard::new(provider).with_chart_dir(std::env::temp_dir());

        let err = dashboard.analyze("GONE").await.unwrap_err();

        assert!(matches!(err, AnalysisError::NotFound(s) if s == "GONE"));
        assert!(!dashboard.provider.profile_requested.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_profile_scores_zero() {
        let provider = MockProvider::new(year_of_bars(), CompanyProfile::default());
        let dashboard = Dashboard::new(provider).with_chart_dir(std::env::temp_dir());

        let analysis = dashboard.analyze("BLANK").await.unwrap();

        assert_eq!(analysis.evaluation.score, 0);
        assert!(analysis.evaluation.reasons.is_empty());
        assert!(analysis.evaluation.concerns.is_empty());
        std::fs::remove_file(&analysis.chart_path).ok();
    }
}
