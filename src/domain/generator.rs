//! Synthetic daily price/volume series.
//!
//! Price for an asset on a date is
//! `base_price * regime * noise * seasonal * event`, where noise is drawn from
//! N(1, volatility/100) and the other factors come from the
//! [`MarketCalendar`]. Pegged assets only receive the noise factor.

use chrono::NaiveDate;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use crate::domain::asset::Asset;
use crate::domain::calendar::MarketCalendar;
use crate::domain::catalog::AssetCatalog;
use crate::domain::history::{AssetSeries, MarketHistory};
use crate::domain::price_point::PricePoint;

/// Lower bound on the daily noise factor; keeps prices strictly positive for
/// extreme draws.
pub const MIN_NOISE_FACTOR: f64 = 0.01;

/// Volume is the asset's baseline scaled by a factor from this interval.
const VOLUME_SPREAD: (f64, f64) = (0.5, 1.5);

pub const DEFAULT_START_DATE: (i32, u32, u32) = (2020, 1, 1);

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub seed: Option<u64>,
}

/// The four multiplicative components behind one generated price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFactors {
    pub regime: f64,
    pub noise: f64,
    pub seasonal: f64,
    pub event: f64,
}

impl PriceFactors {
    pub fn combined(&self) -> f64 {
        self.regime * self.noise * self.seasonal * self.event
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntheticSeriesGenerator {
    calendar: MarketCalendar,
}

impl SyntheticSeriesGenerator {
    pub fn new(calendar: MarketCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &MarketCalendar {
        &self.calendar
    }

    pub fn factors<R: Rng + ?Sized>(
        &self,
        asset: &Asset,
        date: NaiveDate,
        rng: &mut R,
    ) -> PriceFactors {
        let noise = sample_noise(asset.volatility, rng);
        if asset.category.is_pegged() {
            return PriceFactors {
                regime: 1.0,
                noise,
                seasonal: 1.0,
                event: 1.0,
            };
        }
        PriceFactors {
            regime: self.calendar.regime_factor(date, rng),
            noise,
            seasonal: self.calendar.seasonal_factor(date, rng),
            event: self.calendar.event_factor(date, rng),
        }
    }

    pub fn point_on<R: Rng + ?Sized>(
        &self,
        asset: &Asset,
        date: NaiveDate,
        rng: &mut R,
    ) -> PricePoint {
        let factors = self.factors(asset, date, rng);
        let volume = asset.daily_volume * 1e9 * rng.gen_range(VOLUME_SPREAD.0..VOLUME_SPREAD.1);
        PricePoint {
            date,
            symbol: asset.symbol.clone(),
            price: asset.base_price * factors.combined(),
            volume,
            intraday_volatility: (factors.noise - 1.0).abs() * 100.0,
        }
    }

    /// One point per calendar day from `start` to `end` inclusive.
    pub fn generate_series<R: Rng + ?Sized>(
        &self,
        asset: &Asset,
        start: NaiveDate,
        end: NaiveDate,
        rng: &mut R,
    ) -> Vec<PricePoint> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| self.point_on(asset, d, rng))
            .collect()
    }

    /// Series for every asset in the catalog over `[start, end]`.
    pub fn generate_history<R: Rng + ?Sized>(
        &self,
        catalog: &AssetCatalog,
        start: NaiveDate,
        end: NaiveDate,
        rng: &mut R,
    ) -> MarketHistory {
        let days = if end >= start {
            (end - start).num_days() as usize + 1
        } else {
            0
        };
        let mut series: Vec<AssetSeries> = catalog
            .iter()
            .map(|asset| AssetSeries {
                asset: asset.clone(),
                points: Vec::with_capacity(days),
            })
            .collect();

        for date in start.iter_days().take_while(|d| *d <= end) {
            for entry in series.iter_mut() {
                let point = self.point_on(&entry.asset, date, rng);
                entry.points.push(point);
            }
        }

        debug!(
            assets = series.len(),
            days,
            %start,
            %end,
            "generated synthetic history"
        );

        MarketHistory::new(start, end, series)
    }
}

fn sample_noise<R: Rng + ?Sized>(volatility: f64, rng: &mut R) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    (1.0 + z * volatility / 100.0).max(MIN_NOISE_FACTOR)
}
