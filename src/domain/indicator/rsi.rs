//! RSI (Relative Strength Index) indicator implementation.
//!
//! Average gain and average loss are simple trailing means over the last n
//! price changes (no Wilder smoothing):
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 there is no signal and the point is invalid.
//!
//! Warmup: first n points are invalid (need n price changes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_point::PricePoint;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(points.len());

    // changes[k] is the move from point k to point k + 1
    let changes: Vec<f64> = points.windows(2).map(|w| w[1].price - w[0].price).collect();

    for (i, point) in points.iter().enumerate() {
        if period == 0 || i < period {
            values.push(IndicatorPoint::invalid(point.date, IndicatorValue::Simple(0.0)));
            continue;
        }

        let window = &changes[i - period..i];
        let avg_gain = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
        let avg_loss = -window.iter().filter(|c| **c < 0.0).sum::<f64>() / period as f64;

        if avg_loss == 0.0 {
            values.push(IndicatorPoint::invalid(point.date, IndicatorValue::Simple(0.0)));
            continue;
        }

        let rsi = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
        values.push(IndicatorPoint {
            date: point.date,
            valid: true,
            value: IndicatorValue::Simple(rsi),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
