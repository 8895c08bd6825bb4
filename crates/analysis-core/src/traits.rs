use async_trait::async_trait;

use crate::{AnalysisError, Bar, CompanyProfile, FinancialStatements};

/// Trait for market-data providers
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Company profile fields for a symbol.
    async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, AnalysisError>;

    /// One year of daily bars, ascending by date. Implementations must fail
    /// with [`AnalysisError::NotFound`] when no history exists.
    async fn get_history(&self, symbol: &str) -> Result<Vec<Bar>, AnalysisError>;

    /// Balance sheet, income statement and cash flow.
    async fn get_statements(&self, symbol: &str) -> Result<FinancialStatements, AnalysisError>;
}
