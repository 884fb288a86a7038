//! Generated market history and period filtering.

use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::domain::asset::Asset;
use crate::domain::error::DashboardError;
use crate::domain::price_point::PricePoint;

#[derive(Debug, Clone, PartialEq)]
pub struct AssetSeries {
    pub asset: Asset,
    pub points: Vec<PricePoint>,
}

impl AssetSeries {
    pub fn last_point(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Points dated strictly after `cutoff`.
    pub fn since(&self, cutoff: NaiveDate) -> &[PricePoint] {
        let start = self.points.partition_point(|p| p.date <= cutoff);
        &self.points[start..]
    }
}

/// Look-back window for charts and tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    All,
}

impl Period {
    pub fn days(self) -> Option<i64> {
        match self {
            Period::OneMonth => Some(30),
            Period::ThreeMonths => Some(90),
            Period::SixMonths => Some(180),
            Period::OneYear => Some(365),
            Period::TwoYears => Some(730),
            Period::All => None,
        }
    }

    /// Cutoff relative to `end`; points on or before it fall outside the period.
    pub fn cutoff(self, end: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|d| end - Duration::days(d))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::OneMonth => "1m",
            Period::ThreeMonths => "3m",
            Period::SixMonths => "6m",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::All => "all",
        };
        f.write_str(label)
    }
}

impl FromStr for Period {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" => Ok(Period::OneMonth),
            "3m" => Ok(Period::ThreeMonths),
            "6m" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "all" => Ok(Period::All),
            other => Err(DashboardError::invalid(
                "cli",
                "period",
                format!("unknown period '{other}' (expected 1m, 3m, 6m, 1y, 2y or all)"),
            )),
        }
    }
}

/// One series per asset, all covering the same calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketHistory {
    start: NaiveDate,
    end: NaiveDate,
    series: Vec<AssetSeries>,
}

impl MarketHistory {
    pub fn new(start: NaiveDate, end: NaiveDate, series: Vec<AssetSeries>) -> Self {
        Self { start, end, series }
    }

    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn all(&self) -> &[AssetSeries] {
        &self.series
    }

    pub fn get(&self, symbol: &str) -> Option<&AssetSeries> {
        self.series
            .iter()
            .find(|s| s.asset.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn series(&self, symbol: &str) -> Result<&AssetSeries, DashboardError> {
        self.get(symbol).ok_or_else(|| DashboardError::UnknownAsset {
            symbol: symbol.to_string(),
        })
    }

    pub fn last_point(&self, symbol: &str) -> Option<&PricePoint> {
        self.get(symbol).and_then(AssetSeries::last_point)
    }

    /// Trailing slice of `symbol`'s series covered by `period`.
    pub fn within(&self, symbol: &str, period: Period) -> Result<&[PricePoint], DashboardError> {
        let series = self.series(symbol)?;
        Ok(match period.cutoff(self.end) {
            Some(cutoff) => series.since(cutoff),
            None => &series.points,
        })
    }

    /// Copy restricted to `period`, optionally to a single symbol.
    pub fn trailing(&self, period: Period, symbol: Option<&str>) -> Result<Self, DashboardError> {
        let series = match symbol {
            Some(symbol) => vec![self.series(symbol)?],
            None => self.series.iter().collect(),
        };
        let cutoff = period.cutoff(self.end);
        let series = series
            .into_iter()
            .map(|s| AssetSeries {
                asset: s.asset.clone(),
                points: match cutoff {
                    Some(cutoff) => s.since(cutoff).to_vec(),
                    None => s.points.clone(),
                },
            })
            .collect();
        let start = match cutoff {
            Some(cutoff) => (cutoff + Duration::days(1)).max(self.start),
            None => self.start,
        };
        Ok(Self::new(start, self.end, series))
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::Category;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(symbol: &str, start: NaiveDate, days: usize) -> AssetSeries {
        let points = start
            .iter_days()
            .take(days)
            .enumerate()
            .map(|(i, d)| PricePoint {
                date: d,
                symbol: symbol.into(),
                price: 100.0 + i as f64,
                volume: 1.0,
                intraday_volatility: 0.5,
            })
            .collect();
        AssetSeries {
            asset: Asset {
                symbol: symbol.into(),
                name: symbol.into(),
                category: Category::Major,
                base_price: 100.0,
                volatility: 1.0,
                total_supply: None,
                daily_volume: 1.0,
                blockchain: None,
                launched: None,
            },
            points,
        }
    }

    fn history() -> MarketHistory {
        let start = date(2023, 1, 1);
        let end = date(2024, 12, 31);
        let days = (end - start).num_days() as usize + 1;
        MarketHistory::new(
            start,
            end,
            vec![series("BTC/USD", start, days), series("ETH/USD", start, days)],
        )
    }

    #[test]
    fn period_parses_labels() {
        assert_eq!("1m".parse::<Period>().unwrap(), Period::OneMonth);
        assert_eq!("2Y".parse::<Period>().unwrap(), Period::TwoYears);
        assert_eq!(" all ".parse::<Period>().unwrap(), Period::All);
        assert!("5w".parse::<Period>().is_err());
    }

    #[test]
    fn within_one_month_has_thirty_points() {
        let history = history();
        let points = history.within("BTC/USD", Period::OneMonth).unwrap();
        assert_eq!(points.len(), 30);
        assert_eq!(points.last().unwrap().date, date(2024, 12, 31));
        assert_eq!(points.first().unwrap().date, date(2024, 12, 2));
    }

    #[test]
    fn within_all_returns_full_series() {
        let history = history();
        let points = history.within("ETH/USD", Period::All).unwrap();
        assert_eq!(points.len(), 731);
    }

    #[test]
    fn period_longer_than_history_returns_everything() {
        let start = date(2024, 12, 1);
        let end = date(2024, 12, 31);
        let history = MarketHistory::new(start, end, vec![series("BTC/USD", start, 31)]);
        let points = history.within("BTC/USD", Period::OneYear).unwrap();
        assert_eq!(points.len(), 31);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let history = history();
        assert!(history.get("btc/usd").is_some());
        assert_eq!(history.last_point("eth/usd").unwrap().date, date(2024, 12, 31));
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let history = history();
        let err = history.within("XYZ/USD", Period::All).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownAsset { symbol } if symbol == "XYZ/USD"));
    }

    #[test]
    fn trailing_restricts_period_and_symbol() {
        let history = history();
        let recent = history.trailing(Period::OneMonth, Some("eth/usd")).unwrap();
        assert_eq!(recent.all().len(), 1);
        assert_eq!(recent.point_count(), 30);
        assert_eq!(recent.date_range(), (date(2024, 12, 2), date(2024, 12, 31)));

        let everything = history.trailing(Period::All, None).unwrap();
        assert_eq!(everything, history);
    }

    #[test]
    fn trailing_unknown_symbol() {
        assert!(history().trailing(Period::All, Some("NOPE")).is_err());
    }

    #[test]
    fn point_count_sums_series() {
        assert_eq!(history().point_count(), 731 * 2);
    }
}
