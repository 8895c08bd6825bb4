use std::path::Path;

use analysis_core::{AnalysisError, AugmentedSeries};
use plotters::prelude::*;

pub const CHART_WIDTH: u32 = 1280;
pub const CHART_HEIGHT: u32 = 800;

// Row heights: price 60%, RSI 20%, MACD 20%
const PRICE_HEIGHT: u32 = 480;
const RSI_HEIGHT: u32 = 160;

const MA50_COLOR: RGBColor = RGBColor(255, 165, 0);
const MA200_COLOR: RGBColor = RGBColor(30, 60, 200);
const RSI_COLOR: RGBColor = RGBColor(128, 0, 128);
const MACD_COLOR: RGBColor = RGBColor(30, 60, 200);
const SIGNAL_COLOR: RGBColor = RGBColor(255, 165, 0);

/// Render the three-row technical chart (candlestick + moving averages,
/// RSI with 70/30 reference lines, MACD + signal) to a PNG file.
///
/// Presentation only: every plotted value comes straight from the
/// augmented series.
pub fn render_chart(
    symbol: &str,
    series: &AugmentedSeries,
    path: &Path,
) -> Result<(), AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "cannot chart an empty series".to_string(),
        ));
    }

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let (price_area, lower) = root.split_vertically(PRICE_HEIGHT);
    let (rsi_area, macd_area) = lower.split_vertically(RSI_HEIGHT);

    let n = series.len() as i32;
    let date_label = |idx: &i32| -> String {
        series
            .bars
            .get(*idx as usize)
            .map(|b| b.timestamp.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    // --- Row 1: candlesticks with MA overlays ---
    let price_lo = series.bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let price_hi = series
        .bars
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = (price_hi - price_lo).max(1e-6) * 0.05;

    let mut price_chart = ChartBuilder::on(&price_area)
        .caption(format!("{symbol} Technical Analysis"), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(0)
        .y_label_area_size(60)
        .build_cartesian_2d(0..n, (price_lo - pad)..(price_hi + pad))
        .map_err(chart_err)?;

    price_chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Price")
        .draw()
        .map_err(chart_err)?;

    let candle_width = ((CHART_WIDTH as f64 / n as f64) * 0.6).max(1.0) as u32;
    price_chart
        .draw_series(series.bars.iter().enumerate().map(|(i, bar)| {
            CandleStick::new(
                i as i32,
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                GREEN.filled(),
                RED.filled(),
                candle_width,
            )
        }))
        .map_err(chart_err)?;

    price_chart
        .draw_series(LineSeries::new(column_points(&series.ma50), &MA50_COLOR))
        .map_err(chart_err)?
        .label("50-day MA")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], MA50_COLOR));

    price_chart
        .draw_series(LineSeries::new(column_points(&series.ma200), &MA200_COLOR))
        .map_err(chart_err)?
        .label("200-day MA")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], MA200_COLOR));

    price_chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(BLACK.mix(0.4))
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(chart_err)?;

    // --- Row 2: RSI with overbought/oversold reference lines ---
    let mut rsi_chart = ChartBuilder::on(&rsi_area)
        .margin(10)
        .x_label_area_size(0)
        .y_label_area_size(60)
        .build_cartesian_2d(0..n, 0.0..100.0)
        .map_err(chart_err)?;

    rsi_chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("RSI")
        .y_labels(5)
        .draw()
        .map_err(chart_err)?;

    rsi_chart
        .draw_series(LineSeries::new(column_points(&series.rsi), &RSI_COLOR))
        .map_err(chart_err)?;

    for (level, color) in [(70.0, RED), (30.0, GREEN)] {
        rsi_chart
            .draw_series(DashedLineSeries::new(
                [(0, level), ((n - 1).max(0), level)],
                6,
                4,
                color.stroke_width(1),
            ))
            .map_err(chart_err)?;
    }

    // --- Row 3: MACD and signal ---
    let macd_values: Vec<f64> = series
        .macd
        .iter()
        .chain(series.signal.iter())
        .filter_map(|v| *v)
        .collect();
    let macd_lo = macd_values.iter().copied().fold(f64::INFINITY, f64::min);
    let macd_hi = macd_values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let (macd_lo, macd_hi) = if macd_values.is_empty() {
        (-1.0, 1.0)
    } else {
        let pad = (macd_hi - macd_lo).max(1e-6) * 0.1;
        (macd_lo - pad, macd_hi + pad)
    };

    let mut macd_chart = ChartBuilder::on(&macd_area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0..n, macd_lo..macd_hi)
        .map_err(chart_err)?;

    macd_chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("MACD")
        .y_labels(5)
        .x_labels(8)
        .x_label_formatter(&date_label)
        .draw()
        .map_err(chart_err)?;

    macd_chart
        .draw_series(LineSeries::new(column_points(&series.macd), &MACD_COLOR))
        .map_err(chart_err)?
        .label("MACD")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], MACD_COLOR));

    macd_chart
        .draw_series(LineSeries::new(column_points(&series.signal), &SIGNAL_COLOR))
        .map_err(chart_err)?
        .label("Signal")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], SIGNAL_COLOR));

    macd_chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(BLACK.mix(0.4))
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Indexed points for the defined portion of an indicator column.
fn column_points(column: &[Option<f64>]) -> Vec<(i32, f64)> {
    column
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|val| (i as i32, val)))
        .collect()
}

fn chart_err<E: std::fmt::Display>(err: E) -> AnalysisError {
    AnalysisError::Chart(err.to_string())
}
