//! Standard Deviation indicator.
//!
//! Sample standard deviation over n prices (divides by n-1).
//! STDDEV(n)[i] = sqrt(sum((P[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) points are invalid. Periods below 2 are never valid.

use crate::domain::indicator::sma::window_mean;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_point::PricePoint;

/// Sample standard deviation of `values`; `None` with fewer than two values.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    Some(variance.sqrt())
}

pub(crate) fn window_mean_and_stddev(points: &[PricePoint]) -> Option<(f64, f64)> {
    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let stddev = sample_stddev(&prices)?;
    Some((window_mean(points), stddev))
}

pub fn calculate_stddev(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let stats = if period >= 2 && i + 1 >= period {
            window_mean_and_stddev(&points[i + 1 - period..=i])
        } else {
            None
        };

        values.push(match stats {
            Some((_, stddev)) => IndicatorPoint {
                date: point.date,
                valid: true,
                value: IndicatorValue::Simple(stddev),
            },
            None => IndicatorPoint::invalid(point.date, IndicatorValue::Simple(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}
