use analysis_core::{AnalysisError, Evaluation, MetricSet};

use crate::metrics::keys;

/// One point per predicate group.
pub const MAX_SCORE: u32 = 12;

/// Score a metric set against the fixed heuristic battery.
///
/// Twelve independent predicate groups, evaluated in a fixed order, each
/// contributing 0 or 1 to the score. A passing group appends its reason
/// text; three groups (P/E, current ratio, debt/equity) carry a disjoint
/// concern threshold on the other side. A metric can land between the two
/// thresholds and contribute to neither list.
///
/// Missing fundamentals arrive as 0.0 from the extractor, so every reward
/// predicate requires a strictly positive value; a key absent from the set
/// altogether is a contract violation and fails with `MissingMetric`.
pub fn evaluate(metrics: &MetricSet) -> Result<Evaluation, AnalysisError> {
    let pe = metrics.get(keys::PE_RATIO)?;
    let peg = metrics.get(keys::PEG_RATIO)?;
    let pb = metrics.get(keys::PRICE_TO_BOOK)?;
    let ev_ebitda = metrics.get(keys::EV_TO_EBITDA)?;
    let current_ratio = metrics.get(keys::CURRENT_RATIO)?;
    let debt_equity = metrics.get(keys::DEBT_TO_EQUITY)?;
    let roe = metrics.get(keys::RETURN_ON_EQUITY)?;
    let roa = metrics.get(keys::RETURN_ON_ASSETS)?;
    let operating_margin = metrics.get(keys::OPERATING_MARGIN)?;
    let revenue_growth = metrics.get(keys::REVENUE_GROWTH)?;
    let earnings_growth = metrics.get(keys::EARNINGS_GROWTH)?;
    let dividend_yield = metrics.get(keys::DIVIDEND_YIELD)?;
    let payout_ratio = metrics.get(keys::PAYOUT_RATIO)?;

    let mut score = 0;
    let mut reasons = Vec::new();
    let mut concerns = Vec::new();

    // Valuation criteria
    if pe > 0.0 && pe < 25.0 {
        score += 1;
        reasons.push("P/E ratio is reasonable (< 25)".to_string());
    } else if pe > 35.0 {
        concerns.push("High P/E ratio indicates potential overvaluation".to_string());
    }

    if peg > 0.0 && peg < 1.5 {
        score += 1;
        reasons.push("PEG ratio indicates good value (< 1.5)".to_string());
    }

    if pb > 0.0 && pb < 3.0 {
        score += 1;
        reasons.push("Price/Book ratio is attractive (< 3)".to_string());
    }

    if ev_ebitda > 0.0 && ev_ebitda < 15.0 {
        score += 1;
        reasons.push("EV/EBITDA indicates reasonable valuation (< 15)".to_string());
    }

    // Financial health criteria
    if current_ratio > 1.5 {
        score += 1;
        reasons.push("Strong current ratio (> 1.5)".to_string());
    } else if current_ratio < 1.0 && current_ratio > 0.0 {
        concerns.push("Low current ratio indicates potential liquidity issues".to_string());
    }

    if debt_equity > 0.0 && debt_equity < 1.0 {
        score += 1;
        reasons.push("Low debt-to-equity ratio (< 1)".to_string());
    } else if debt_equity > 2.0 {
        concerns.push("High debt levels relative to equity".to_string());
    }

    // Profitability criteria
    if roe > 0.15 {
        score += 1;
        reasons.push("Strong Return on Equity (> 15%)".to_string());
    }

    if roa > 0.07 {
        score += 1;
        reasons.push("Good Return on Assets (> 7%)".to_string());
    }

    if operating_margin > 0.15 {
        score += 1;
        reasons.push("Healthy operating margin (> 15%)".to_string());
    }

    // Growth criteria
    if revenue_growth > 0.1 {
        score += 1;
        reasons.push("Strong revenue growth (> 10%)".to_string());
    }

    if earnings_growth > 0.1 {
        score += 1;
        reasons.push("Strong earnings growth (> 10%)".to_string());
    }

    // Dividend criteria
    if dividend_yield > 0.02 && payout_ratio < 0.75 {
        score += 1;
        reasons.push("Sustainable dividend with good yield (> 2%)".to_string());
    }

    Ok(Evaluation {
        score,
        max_score: MAX_SCORE,
        reasons,
        concerns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::MetricSet;

    fn strong_metrics() -> MetricSet {
        let mut m = MetricSet::new();
        m.insert(keys::CURRENT_PRICE, 150.0);
        m.insert(keys::WEEK_52_HIGH, 180.0);
        m.insert(keys::WEEK_52_LOW, 120.0);
        m.insert(keys::MARKET_CAP_B, 500.0);
        m.insert(keys::PE_RATIO, 20.0);
        m.insert(keys::FORWARD_PE, 18.0);
        m.insert(keys::PEG_RATIO, 1.2);
        m.insert(keys::PRICE_TO_BOOK, 2.0);
        m.insert(keys::PRICE_TO_SALES, 3.0);
        m.insert(keys::EV_TO_EBITDA, 10.0);
        m.insert(keys::CURRENT_RATIO, 2.0);
        m.insert(keys::DEBT_TO_EQUITY, 0.5);
        m.insert(keys::QUICK_RATIO, 1.5);
        m.insert(keys::RETURN_ON_EQUITY, 0.2);
        m.insert(keys::RETURN_ON_ASSETS, 0.1);
        m.insert(keys::PROFIT_MARGIN, 0.18);
        m.insert(keys::OPERATING_MARGIN, 0.2);
        m.insert(keys::GROSS_MARGIN, 0.45);
        m.insert(keys::REVENUE_GROWTH, 0.15);
        m.insert(keys::EARNINGS_GROWTH, 0.12);
        m.insert(keys::DIVIDEND_YIELD, 0.03);
        m.insert(keys::PAYOUT_RATIO, 0.5);
        m
    }

    fn zero_metrics() -> MetricSet {
        let mut m = MetricSet::new();
        for key in crate::metrics::ALL_KEYS {
            m.insert(key, 0.0);
        }
        m
    }

    #[test]
    fn strong_metrics_score_full_marks() {
        let eval = evaluate(&strong_metrics()).unwrap();

        assert_eq!(eval.score, 12);
        assert_eq!(eval.max_score, 12);
        assert_eq!(eval.reasons.len(), 12);
        assert!(eval.concerns.is_empty());
    }

    #[test]
    fn failing_groups_produce_concerns() {
        let mut m = strong_metrics();
        m.insert(keys::PE_RATIO, 40.0);
        m.insert(keys::CURRENT_RATIO, 0.8);
        m.insert(keys::DEBT_TO_EQUITY, 2.5);

        let eval = evaluate(&m).unwrap();

        assert_eq!(eval.score, 9);
        assert_eq!(
            eval.concerns,
            vec![
                "High P/E ratio indicates potential overvaluation".to_string(),
                "Low current ratio indicates potential liquidity issues".to_string(),
                "High debt levels relative to equity".to_string(),
            ]
        );
    }

    #[test]
    fn all_zero_metrics_score_nothing() {
        let eval = evaluate(&zero_metrics()).unwrap();

        assert_eq!(eval.score, 0);
        assert!(eval.reasons.is_empty());
        assert!(eval.concerns.is_empty());
    }

    #[test]
    fn neither_threshold_contributes_nothing() {
        // P/E of 30 is neither rewarded (< 25) nor flagged (> 35)
        let mut m = strong_metrics();
        m.insert(keys::PE_RATIO, 30.0);

        let eval = evaluate(&m).unwrap();

        assert_eq!(eval.score, 11);
        assert!(eval.concerns.is_empty());
        assert!(!eval
            .reasons
            .iter()
            .any(|r| r.contains("P/E ratio is reasonable")));
    }

    #[test]
    fn evaluation_is_deterministic_and_ordered() {
        let m = strong_metrics();
        let a = evaluate(&m).unwrap();
        let b = evaluate(&m).unwrap();

        assert_eq!(a, b);
        // Valuation reasons come before health, health before profitability
        assert!(a.reasons[0].starts_with("P/E ratio"));
        assert!(a.reasons[4].starts_with("Strong current ratio"));
        assert!(a.reasons[11].starts_with("Sustainable dividend"));
    }

    #[test]
    fn missing_key_is_a_contract_violation() {
        let mut m = MetricSet::new();
        m.insert(keys::PE_RATIO, 20.0);

        let err = evaluate(&m).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingMetric(_)));
    }

    #[test]
    fn score_stays_within_bounds() {
        for metrics in [strong_metrics(), zero_metrics()] {
            let eval = evaluate(&metrics).unwrap();
            assert!(eval.score <= MAX_SCORE);
            assert!(eval.reasons.len() as u32 <= MAX_SCORE);
        }
    }
}
