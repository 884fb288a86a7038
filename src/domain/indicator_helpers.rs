//! Shared helpers for computing sets of indicators over a price series.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price_point::PricePoint;

pub fn calculate(points: &[PricePoint], indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => calculate_sma(points, period),
        IndicatorType::Rsi(period) => calculate_rsi(points, period),
        IndicatorType::Stddev(period) => calculate_stddev(points, period),
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => calculate_bollinger(points, period, stddev_mult_x100),
    }
}

/// Computes each distinct indicator once, keyed by type.
pub fn compute_indicators(
    points: &[PricePoint],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for indicator_type in types {
        out.entry(*indicator_type)
            .or_insert_with(|| calculate(points, *indicator_type));
    }
    out
}

/// Parameters of the technical analysis panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorConfig {
    pub ma_short: usize,
    pub ma_long: usize,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_short: 20,
            ma_long: 50,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_mult: 2.0,
        }
    }
}

impl IndicatorConfig {
    pub fn indicator_types(&self) -> [IndicatorType; 4] {
        [
            IndicatorType::Sma(self.ma_short),
            IndicatorType::Sma(self.ma_long),
            IndicatorType::Rsi(self.rsi_period),
            IndicatorType::bollinger(self.bollinger_period, self.bollinger_mult),
        ]
    }
}

/// One row of the technical table; `None` where an indicator is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalRow {
    pub date: NaiveDate,
    pub price: f64,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub bollinger: Option<(f64, f64, f64)>,
}

/// Price alongside short/long moving averages, RSI and Bollinger bands.
pub fn technical_table(points: &[PricePoint], config: &IndicatorConfig) -> Vec<TechnicalRow> {
    let [short_type, long_type, rsi_type, bollinger_type] = config.indicator_types();
    let indicators = compute_indicators(points, &config.indicator_types());

    let value_at = |indicator_type: &IndicatorType, i: usize| {
        indicators
            .get(indicator_type)
            .and_then(|s| s.values.get(i))
            .and_then(|p| p.simple())
    };

    points
        .iter()
        .enumerate()
        .map(|(i, point)| TechnicalRow {
            date: point.date,
            price: point.price,
            ma_short: value_at(&short_type, i),
            ma_long: value_at(&long_type, i),
            rsi: value_at(&rsi_type, i),
            bollinger: indicators
                .get(&bollinger_type)
                .and_then(|s| s.values.get(i))
                .and_then(|p| p.bands()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_points(prices: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .zip(start.iter_days())
            .map(|(&price, date)| PricePoint {
                date,
                symbol: "TEST".into(),
                price,
                volume: 1000.0,
                intraday_volatility: 0.0,
            })
            .collect()
    }

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn compute_indicators_dedups_types() {
        let points = make_points(&zigzag(30));
        let types = [
            IndicatorType::Sma(5),
            IndicatorType::Sma(5),
            IndicatorType::Rsi(14),
        ];
        let map = compute_indicators(&points, &types);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&IndicatorType::Sma(5)].values.len(), 30);
    }

    #[test]
    fn calculate_dispatches_by_type() {
        let points = make_points(&zigzag(25));
        for indicator_type in [
            IndicatorType::Sma(3),
            IndicatorType::Rsi(5),
            IndicatorType::Stddev(4),
            IndicatorType::bollinger(6, 2.0),
        ] {
            let series = calculate(&points, indicator_type);
            assert_eq!(series.indicator_type, indicator_type);
        }
    }

    #[test]
    fn technical_table_respects_warmups() {
        let points = make_points(&zigzag(60));
        let rows = technical_table(&points, &IndicatorConfig::default());

        assert_eq!(rows.len(), 60);
        assert!(rows[18].ma_short.is_none());
        assert!(rows[19].ma_short.is_some());
        assert!(rows[48].ma_long.is_none());
        assert!(rows[49].ma_long.is_some());
        assert!(rows[13].rsi.is_none());
        assert!(rows[18].bollinger.is_none());
        assert!(rows[19].bollinger.is_some());
    }

    #[test]
    fn technical_table_bands_bracket_ma() {
        let points = make_points(&zigzag(80));
        let config = IndicatorConfig::default();
        for row in technical_table(&points, &config) {
            if let (Some((upper, middle, lower)), Some(ma)) = (row.bollinger, row.ma_short) {
                assert!((middle - ma).abs() < 1e-9);
                assert!(upper >= ma && ma >= lower);
            }
        }
    }

    #[test]
    fn ma_stays_inside_bands_after_price_spike() {
        let mut prices = vec![1e8];
        prices.extend([0.1; 40]);
        let points = make_points(&prices);
        let config = IndicatorConfig::default();
        assert_eq!(config.ma_short, config.bollinger_period);

        let mut checked = 0;
        for row in technical_table(&points, &config) {
            if let (Some((upper, middle, lower)), Some(ma)) = (row.bollinger, row.ma_short) {
                assert_eq!(ma, middle, "{}", row.date);
                assert!(upper >= ma && ma >= lower, "{}", row.date);
                checked += 1;
            }
        }
        assert_eq!(checked, 22);
    }

    #[test]
    fn empty_series_gives_empty_table() {
        assert!(technical_table(&[], &IndicatorConfig::default()).is_empty());
    }
}
