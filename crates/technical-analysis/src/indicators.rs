/// Simple Moving Average, aligned with the input.
///
/// The first `period - 1` slots are `None`: the window has not filled yet.
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return result;
    }

    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result[i] = Some(sum / period as f64);
    }
    result
}

/// Exponential Moving Average over the full series.
///
/// Recursive, unadjusted form: seeded with the first observation, then
/// `ema[i] = (x[i] - ema[i-1]) * a + ema[i-1]` with `a = 2 / (span + 1)`.
/// Defined from index 0, so the output has no undefined prefix.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len());
    let multiplier = 2.0 / (span as f64 + 1.0);

    result.push(data[0]);
    for i in 1..data.len() {
        let ema_val = (data[i] - result[i - 1]) * multiplier + result[i - 1];
        result.push(ema_val);
    }

    result
}

/// Relative Strength Index, aligned with the input.
///
/// Average gain and average loss are plain rolling means of the
/// close-to-close deltas over `period`. A window with zero average loss
/// saturates to 100 rather than dividing by zero.
pub fn rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period + 1 {
        return result;
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    // Delta j covers prices j..j+1, so the first full window ends at price
    // index `period`.
    for i in period..data.len() {
        let window_gain: f64 = gains[i - period..i].iter().sum::<f64>() / period as f64;
        let window_loss: f64 = losses[i - period..i].iter().sum::<f64>() / period as f64;

        let value = if window_loss == 0.0 {
            100.0
        } else {
            let rs = window_gain / window_loss;
            100.0 - (100.0 / (1.0 + rs))
        };
        result[i] = Some(value);
    }

    result
}

/// MACD (Moving Average Convergence Divergence)
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
}

/// MACD line (fast EMA minus slow EMA of close) and its signal line (EMA of
/// the MACD line). Both are full-length: the underlying EMAs are defined
/// from index 0.
pub fn macd(data: &[f64], fast_span: usize, slow_span: usize, signal_span: usize) -> MacdResult {
    if fast_span == 0 || slow_span == 0 || signal_span == 0 || data.is_empty() {
        return MacdResult {
            macd_line: vec![],
            signal_line: vec![],
        };
    }

    let ema_fast = ema(data, fast_span);
    let ema_slow = ema(data, slow_span);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema(&macd_line, signal_span);

    MacdResult {
        macd_line,
        signal_line,
    }
}

/// Back-fill the undefined prefix of a column from the first defined value.
///
/// A column with no defined value at all is left untouched.
pub fn backfill(column: &mut [Option<f64>]) {
    let first_valid = column.iter().position(|v| v.is_some());
    if let Some(idx) = first_valid {
        let fill = column[idx];
        for slot in column[..idx].iter_mut() {
            *slot = fill;
        }
    }
}
