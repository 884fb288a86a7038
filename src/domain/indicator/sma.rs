//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]). Warmup: first (n-1) points are invalid.
//! A period of 0 yields an all-invalid series.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_point::PricePoint;

/// Arithmetic mean of the window's prices; also the Bollinger middle band.
pub(crate) fn window_mean(window: &[PricePoint]) -> f64 {
    window.iter().map(|p| p.price).sum::<f64>() / window.len() as f64
}

pub fn calculate_sma(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(IndicatorPoint::invalid(point.date, IndicatorValue::Simple(0.0)));
            continue;
        }

        values.push(IndicatorPoint {
            date: point.date,
            valid: true,
            value: IndicatorValue::Simple(window_mean(&points[i + 1 - period..=i])),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
