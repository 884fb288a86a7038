//! Calendar of market regimes, seasonal effects and one-off events.
//!
//! Each adjustment is a multiplicative factor drawn uniformly from a
//! [`FactorRange`]. Regime rules are evaluated in order and only the first
//! matching window applies; a date outside every window gets a factor of 1.0.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

/// Closed interval a multiplier is sampled from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorRange {
    pub low: f64,
    pub high: f64,
}

impl FactorRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.high <= self.low {
            return self.low;
        }
        rng.gen_range(self.low..=self.high)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// A span of days inside a single calendar year: months `first_month..=last_month`,
/// starting at `first_day` of `first_month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub year: i32,
    pub first_month: u32,
    pub last_month: u32,
    pub first_day: u32,
}

impl DateWindow {
    pub const fn year(year: i32) -> Self {
        Self::months(year, 1, 12)
    }

    pub const fn months(year: i32, first_month: u32, last_month: u32) -> Self {
        Self {
            year,
            first_month,
            last_month,
            first_day: 1,
        }
    }

    pub const fn from_day(year: i32, month: u32, first_day: u32) -> Self {
        Self {
            year,
            first_month: month,
            last_month: month,
            first_day,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if date.year() != self.year {
            return false;
        }
        let month = date.month();
        if month < self.first_month || month > self.last_month {
            return false;
        }
        month > self.first_month || date.day() >= self.first_day
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegimeRule {
    pub name: &'static str,
    pub window: DateWindow,
    pub range: FactorRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalRule {
    pub months: &'static [u32],
    pub range: FactorRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRule {
    pub name: &'static str,
    pub year: i32,
    pub month: u32,
    pub range: FactorRange,
}

/// The full set of calendar adjustments applied by the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketCalendar {
    pub regimes: Vec<RegimeRule>,
    pub seasonal: Vec<SeasonalRule>,
    pub events: Vec<EventRule>,
}

impl MarketCalendar {
    /// Rules modelled on the 2020-2024 crypto cycle. The May 2021 crash is
    /// listed ahead of the early-2021 bull window so that it can match.
    pub fn crypto_cycle() -> Self {
        let regimes = vec![
            RegimeRule {
                name: "bull run 2020",
                window: DateWindow::months(2020, 10, 12),
                range: FactorRange::new(1.02, 1.15),
            },
            RegimeRule {
                name: "crash may 2021",
                window: DateWindow::from_day(2021, 5, 19),
                range: FactorRange::new(0.70, 0.90),
            },
            RegimeRule {
                name: "bull run 2021",
                window: DateWindow::months(2021, 1, 5),
                range: FactorRange::new(1.05, 1.25),
            },
            RegimeRule {
                name: "recovery mid 2021",
                window: DateWindow::months(2021, 7, 10),
                range: FactorRange::new(1.05, 1.15),
            },
            RegimeRule {
                name: "crash november 2021",
                window: DateWindow::months(2021, 11, 12),
                range: FactorRange::new(0.80, 0.95),
            },
            RegimeRule {
                name: "bear market 2022",
                window: DateWindow::year(2022),
                range: FactorRange::new(0.85, 1.05),
            },
            RegimeRule {
                name: "rally late 2023",
                window: DateWindow::months(2023, 10, 12),
                range: FactorRange::new(1.05, 1.20),
            },
            RegimeRule {
                name: "recovery 2023",
                window: DateWindow::months(2023, 1, 9),
                range: FactorRange::new(0.95, 1.10),
            },
            RegimeRule {
                name: "bull market 2024",
                window: DateWindow::year(2024),
                range: FactorRange::new(1.02, 1.15),
            },
        ];

        let seasonal = vec![
            SeasonalRule {
                months: &[10],
                range: FactorRange::new(1.01, 1.05),
            },
            SeasonalRule {
                months: &[12],
                range: FactorRange::new(1.01, 1.03),
            },
            SeasonalRule {
                months: &[1, 2],
                range: FactorRange::new(0.98, 1.02),
            },
        ];

        let events = vec![
            EventRule {
                name: "halving 2020",
                year: 2020,
                month: 5,
                range: FactorRange::new(1.10, 1.30),
            },
            EventRule {
                name: "halving 2024",
                year: 2024,
                month: 5,
                range: FactorRange::new(1.10, 1.30),
            },
        ];

        Self {
            regimes,
            seasonal,
            events,
        }
    }

    /// First regime rule whose window contains `date`.
    pub fn regime_for(&self, date: NaiveDate) -> Option<&RegimeRule> {
        self.regimes.iter().find(|rule| rule.window.contains(date))
    }

    pub fn seasonal_for(&self, date: NaiveDate) -> Option<&SeasonalRule> {
        let month = date.month();
        self.seasonal.iter().find(|rule| rule.months.contains(&month))
    }

    pub fn event_for(&self, date: NaiveDate) -> Option<&EventRule> {
        self.events
            .iter()
            .find(|rule| rule.year == date.year() && rule.month == date.month())
    }

    pub fn regime_factor<R: Rng + ?Sized>(&self, date: NaiveDate, rng: &mut R) -> f64 {
        self.regime_for(date).map_or(1.0, |rule| rule.range.sample(rng))
    }

    pub fn seasonal_factor<R: Rng + ?Sized>(&self, date: NaiveDate, rng: &mut R) -> f64 {
        self.seasonal_for(date).map_or(1.0, |rule| rule.range.sample(rng))
    }

    pub fn event_factor<R: Rng + ?Sized>(&self, date: NaiveDate, rng: &mut R) -> f64 {
        self.event_for(date).map_or(1.0, |rule| rule.range.sample(rng))
    }
}

impl Default for MarketCalendar {
    fn default() -> Self {
        Self::crypto_cycle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_contains_month_span() {
        let window = DateWindow::months(2021, 7, 10);
        assert!(window.contains(date(2021, 7, 1)));
        assert!(window.contains(date(2021, 10, 31)));
        assert!(!window.contains(date(2021, 6, 30)));
        assert!(!window.contains(date(2021, 11, 1)));
        assert!(!window.contains(date(2022, 8, 1)));
    }

    #[test]
    fn window_from_day_starts_mid_month() {
        let window = DateWindow::from_day(2021, 5, 19);
        assert!(!window.contains(date(2021, 5, 18)));
        assert!(window.contains(date(2021, 5, 19)));
        assert!(window.contains(date(2021, 5, 31)));
        assert!(!window.contains(date(2021, 6, 1)));
    }

    #[test]
    fn first_matching_regime_wins() {
        let calendar = MarketCalendar::crypto_cycle();
        assert_eq!(
            calendar.regime_for(date(2021, 5, 20)).unwrap().name,
            "crash may 2021"
        );
        assert_eq!(
            calendar.regime_for(date(2021, 5, 10)).unwrap().name,
            "bull run 2021"
        );
        assert_eq!(
            calendar.regime_for(date(2023, 10, 2)).unwrap().name,
            "rally late 2023"
        );
        assert_eq!(
            calendar.regime_for(date(2023, 3, 2)).unwrap().name,
            "recovery 2023"
        );
    }

    #[test]
    fn dates_outside_every_window_are_neutral() {
        let calendar = MarketCalendar::crypto_cycle();
        let mut rng = StdRng::seed_from_u64(7);
        for d in [date(2020, 3, 1), date(2021, 6, 15), date(2025, 8, 1)] {
            assert!(calendar.regime_for(d).is_none(), "{d} should not match");
            assert_eq!(calendar.regime_factor(d, &mut rng), 1.0);
        }
    }

    #[test]
    fn regime_factor_stays_in_range() {
        let calendar = MarketCalendar::crypto_cycle();
        let mut rng = StdRng::seed_from_u64(11);
        let d = date(2022, 6, 1);
        for _ in 0..500 {
            let factor = calendar.regime_factor(d, &mut rng);
            assert!((0.85..=1.05).contains(&factor));
        }
    }

    #[test]
    fn seasonal_by_month() {
        let calendar = MarketCalendar::crypto_cycle();
        assert!(calendar.seasonal_for(date(2022, 10, 5)).is_some());
        assert!(calendar.seasonal_for(date(2022, 2, 5)).is_some());
        assert!(calendar.seasonal_for(date(2022, 7, 5)).is_none());

        let mut rng = StdRng::seed_from_u64(3);
        let factor = calendar.seasonal_factor(date(2022, 12, 24), &mut rng);
        assert!((1.01..=1.03).contains(&factor));
    }

    #[test]
    fn events_only_on_halving_months() {
        let calendar = MarketCalendar::crypto_cycle();
        assert_eq!(
            calendar.event_for(date(2024, 5, 3)).unwrap().name,
            "halving 2024"
        );
        assert!(calendar.event_for(date(2024, 6, 3)).is_none());
        assert!(calendar.event_for(date(2022, 5, 3)).is_none());
    }

    #[test]
    fn degenerate_range_returns_low() {
        let range = FactorRange::new(1.2, 1.2);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(range.sample(&mut rng), 1.2);
    }
}
