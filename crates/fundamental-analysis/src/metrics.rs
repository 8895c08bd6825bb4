use analysis_core::{CompanyProfile, FinancialStatements, MetricSet};

/// Names of the fixed metric set. The extractor populates every one of
/// these; the scorer looks them up by name.
pub mod keys {
    pub const CURRENT_PRICE: &str = "Current Price";
    pub const WEEK_52_HIGH: &str = "52 Week High";
    pub const WEEK_52_LOW: &str = "52 Week Low";
    pub const MARKET_CAP_B: &str = "Market Cap (B)";
    pub const PE_RATIO: &str = "P/E Ratio";
    pub const FORWARD_PE: &str = "Forward P/E";
    pub const PEG_RATIO: &str = "PEG Ratio";
    pub const PRICE_TO_BOOK: &str = "Price/Book";
    pub const PRICE_TO_SALES: &str = "Price/Sales";
    pub const EV_TO_EBITDA: &str = "EV/EBITDA";
    pub const CURRENT_RATIO: &str = "Current Ratio";
    pub const DEBT_TO_EQUITY: &str = "Debt/Equity";
    pub const QUICK_RATIO: &str = "Quick Ratio";
    pub const RETURN_ON_EQUITY: &str = "Return on Equity";
    pub const RETURN_ON_ASSETS: &str = "Return on Assets";
    pub const PROFIT_MARGIN: &str = "Profit Margin";
    pub const OPERATING_MARGIN: &str = "Operating Margin";
    pub const GROSS_MARGIN: &str = "Gross Margin";
    pub const REVENUE_GROWTH: &str = "Revenue Growth";
    pub const EARNINGS_GROWTH: &str = "Earnings Growth";
    pub const DIVIDEND_YIELD: &str = "Dividend Yield";
    pub const PAYOUT_RATIO: &str = "Payout Ratio";
}

/// All metric keys in presentation order.
pub const ALL_KEYS: &[&str] = &[
    keys::CURRENT_PRICE,
    keys::WEEK_52_HIGH,
    keys::WEEK_52_LOW,
    keys::MARKET_CAP_B,
    keys::PE_RATIO,
    keys::FORWARD_PE,
    keys::PEG_RATIO,
    keys::PRICE_TO_BOOK,
    keys::PRICE_TO_SALES,
    keys::EV_TO_EBITDA,
    keys::CURRENT_RATIO,
    keys::DEBT_TO_EQUITY,
    keys::QUICK_RATIO,
    keys::RETURN_ON_EQUITY,
    keys::RETURN_ON_ASSETS,
    keys::PROFIT_MARGIN,
    keys::OPERATING_MARGIN,
    keys::GROSS_MARGIN,
    keys::REVENUE_GROWTH,
    keys::EARNINGS_GROWTH,
    keys::DIVIDEND_YIELD,
    keys::PAYOUT_RATIO,
];

/// Flatten the company profile into the fixed metric set.
///
/// A field the provider omitted becomes 0.0, indistinguishable from a true
/// zero. The scorer's predicates are written to tolerate that. Statements
/// are accepted for interface symmetry with acquisition; scoring does not
/// read them.
pub fn extract_metrics(
    profile: &CompanyProfile,
    _statements: &FinancialStatements,
) -> MetricSet {
    let val = |field: Option<f64>| field.unwrap_or(0.0);

    let mut metrics = MetricSet::new();

    // Price metrics
    metrics.insert(keys::CURRENT_PRICE, val(profile.current_price));
    metrics.insert(keys::WEEK_52_HIGH, val(profile.fifty_two_week_high));
    metrics.insert(keys::WEEK_52_LOW, val(profile.fifty_two_week_low));
    metrics.insert(keys::MARKET_CAP_B, val(profile.market_cap) / 1e9);

    // Valuation metrics
    metrics.insert(keys::PE_RATIO, val(profile.trailing_pe));
    metrics.insert(keys::FORWARD_PE, val(profile.forward_pe));
    metrics.insert(keys::PEG_RATIO, val(profile.peg_ratio));
    metrics.insert(keys::PRICE_TO_BOOK, val(profile.price_to_book));
    metrics.insert(keys::PRICE_TO_SALES, val(profile.price_to_sales));
    metrics.insert(keys::EV_TO_EBITDA, val(profile.enterprise_to_ebitda));

    // Financial health metrics
    metrics.insert(keys::CURRENT_RATIO, val(profile.current_ratio));
    metrics.insert(keys::DEBT_TO_EQUITY, val(profile.debt_to_equity));
    metrics.insert(keys::QUICK_RATIO, val(profile.quick_ratio));

    // Profitability metrics
    metrics.insert(keys::RETURN_ON_EQUITY, val(profile.return_on_equity));
    metrics.insert(keys::RETURN_ON_ASSETS, val(profile.return_on_assets));
    metrics.insert(keys::PROFIT_MARGIN, val(profile.profit_margins));
    metrics.insert(keys::OPERATING_MARGIN, val(profile.operating_margins));
    metrics.insert(keys::GROSS_MARGIN, val(profile.gross_margins));

    // Growth metrics
    metrics.insert(keys::REVENUE_GROWTH, val(profile.revenue_growth));
    metrics.insert(keys::EARNINGS_GROWTH, val(profile.earnings_growth));

    // Dividend metrics
    metrics.insert(keys::DIVIDEND_YIELD, val(profile.dividend_yield));
    metrics.insert(keys::PAYOUT_RATIO, val(profile.payout_ratio));

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_defaults_every_metric_to_zero() {
        let profile = CompanyProfile::default();
        let metrics = extract_metrics(&profile, &FinancialStatements::default());

        assert_eq!(metrics.len(), ALL_KEYS.len());
        for key in ALL_KEYS {
            assert_eq!(metrics.get(key).unwrap(), 0.0, "{key}");
        }
    }

    #[test]
    fn market_cap_is_reported_in_billions() {
        let profile = CompanyProfile {
            market_cap: Some(2_500_000_000_000.0),
            ..Default::default()
        };
        let metrics = extract_metrics(&profile, &FinancialStatements::default());

        assert!((metrics.get(keys::MARKET_CAP_B).unwrap() - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn present_fields_pass_through() {
        let profile = CompanyProfile {
            trailing_pe: Some(24.5),
            dividend_yield: Some(0.021),
            ..Default::default()
        };
        let metrics = extract_metrics(&profile, &FinancialStatements::default());

        assert_eq!(metrics.get(keys::PE_RATIO).unwrap(), 24.5);
        assert_eq!(metrics.get(keys::DIVIDEND_YIELD).unwrap(), 0.021);
        // Absent fields still default rather than going missing
        assert_eq!(metrics.get(keys::PEG_RATIO).unwrap(), 0.0);
    }
}
