use analysis_core::{AnalysisError, AugmentedSeries, Bar};

use crate::indicators::{backfill, macd, rsi, sma};

const MA_SHORT: usize = 50;
const MA_LONG: usize = 200;
const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

/// Compute all derived columns for a daily series and return the augmented
/// result as a new value. The caller's bars are consumed, never aliased;
/// no partially-computed state is observable.
pub fn augment(bars: Vec<Bar>) -> Result<AugmentedSeries, AnalysisError> {
    if bars.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "cannot compute indicators on an empty series".to_string(),
        ));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let mut ma50 = sma(&closes, MA_SHORT);
    let mut ma200 = sma(&closes, MA_LONG);
    let mut rsi_col = rsi(&closes, RSI_PERIOD);

    let macd_result = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let mut macd_col: Vec<Option<f64>> = macd_result.macd_line.into_iter().map(Some).collect();
    let mut signal_col: Vec<Option<f64>> = macd_result.signal_line.into_iter().map(Some).collect();

    backfill(&mut ma50);
    backfill(&mut ma200);
    backfill(&mut rsi_col);
    backfill(&mut macd_col);
    backfill(&mut signal_col);

    Ok(AugmentedSeries {
        bars,
        ma50,
        ma200,
        rsi: rsi_col,
        macd: macd_col,
        signal: signal_col,
    })
}
