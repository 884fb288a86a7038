//! Current quotes and the refresh tick.
//!
//! A [`QuoteBoard`] is seeded from the last historical point of every asset.
//! [`apply_tick`] takes one quote by reference and returns its successor; the
//! board owns its quotes and replaces them wholesale on each tick.

use rand::Rng;
use tracing::debug;

use crate::domain::asset::{Asset, Category};
use crate::domain::catalog::AssetCatalog;
use crate::domain::history::MarketHistory;

/// Supply assumed for market cap when an asset has no supply cap.
pub const UNCAPPED_SUPPLY_PROXY: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteConfig {
    /// |change_pct| above this raises an alert.
    pub alert_threshold: f64,
    /// Probability that a quote moves on a given tick.
    pub change_probability: f64,
    /// Tick moves are drawn from ±this many percent.
    pub max_tick_move_pct: f64,
    /// Initial quotes deviate from the last close by ±this many percent.
    pub initial_move_pct: f64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            alert_threshold: 3.0,
            change_probability: 0.7,
            max_tick_move_pct: 2.0,
            initial_move_pct: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentQuote {
    pub symbol: String,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub change_pct: f64,
    /// The asset's volatility parameter, in percent.
    pub volatility: f64,
    /// Billions of USD.
    pub daily_volume: f64,
    /// Billions of USD.
    pub market_cap: f64,
    /// Bid/ask spread in percent.
    pub spread: f64,
    pub total_supply: Option<f64>,
}

impl CurrentQuote {
    /// Opening quote: last historical close moved by a one-off random change.
    pub fn open<R: Rng + ?Sized>(
        asset: &Asset,
        last_price: f64,
        config: &QuoteConfig,
        rng: &mut R,
    ) -> Self {
        let change_pct = symmetric(config.initial_move_pct, rng);
        let supply = asset.total_supply.unwrap_or(UNCAPPED_SUPPLY_PROXY);
        Self {
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            category: asset.category,
            price: last_price * (1.0 + change_pct / 100.0),
            change_pct,
            volatility: asset.volatility,
            daily_volume: asset.daily_volume,
            market_cap: last_price * supply / 1e9,
            spread: rng.gen_range(0.01..=0.5),
            total_supply: asset.total_supply,
        }
    }
}

/// Successor of `quote` after one refresh. With probability
/// `change_probability` the price moves by up to ±`max_tick_move_pct`,
/// volume is rescaled and market cap follows the price when supply is known;
/// otherwise the quote is returned unchanged.
pub fn apply_tick<R: Rng + ?Sized>(
    quote: &CurrentQuote,
    config: &QuoteConfig,
    rng: &mut R,
) -> CurrentQuote {
    let probability = config.change_probability.clamp(0.0, 1.0);
    if !rng.gen_bool(probability) {
        return quote.clone();
    }

    let variation = symmetric(config.max_tick_move_pct, rng);
    let mut next = quote.clone();
    next.price = quote.price * (1.0 + variation / 100.0);
    next.change_pct = variation;
    next.daily_volume = quote.daily_volume * rng.gen_range(0.8..=1.2);
    if let Some(supply) = quote.total_supply {
        next.market_cap = next.price * supply / 1e9;
    }
    next
}

fn symmetric<R: Rng + ?Sized>(bound: f64, rng: &mut R) -> f64 {
    let bound = bound.abs();
    if bound == 0.0 {
        return 0.0;
    }
    rng.gen_range(-bound..=bound)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Rally,
    Drop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: String,
    pub change_pct: f64,
    pub kind: AlertKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBoard {
    quotes: Vec<CurrentQuote>,
    ticks: u64,
}

impl QuoteBoard {
    pub fn new(quotes: Vec<CurrentQuote>) -> Self {
        Self { quotes, ticks: 0 }
    }

    /// Opens a quote for every catalog asset that has history.
    pub fn open<R: Rng + ?Sized>(
        catalog: &AssetCatalog,
        history: &MarketHistory,
        config: &QuoteConfig,
        rng: &mut R,
    ) -> Self {
        let quotes = catalog
            .iter()
            .filter_map(|asset| {
                history
                    .last_point(&asset.symbol)
                    .map(|last| CurrentQuote::open(asset, last.price, config, rng))
            })
            .collect();
        Self::new(quotes)
    }

    pub fn quotes(&self) -> &[CurrentQuote] {
        &self.quotes
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn get(&self, symbol: &str) -> Option<&CurrentQuote> {
        self.quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, config: &QuoteConfig, rng: &mut R) {
        self.quotes = self
            .quotes
            .iter()
            .map(|q| apply_tick(q, config, rng))
            .collect();
        self.ticks += 1;
        debug!(tick = self.ticks, quotes = self.quotes.len(), "applied refresh tick");
    }

    /// Quotes whose |change_pct| exceeds `threshold`, in board order.
    pub fn alerts(&self, threshold: f64) -> Vec<Alert> {
        self.quotes
            .iter()
            .filter(|q| q.change_pct.abs() > threshold)
            .map(|q| Alert {
                symbol: q.symbol.clone(),
                change_pct: q.change_pct,
                kind: if q.change_pct > 0.0 {
                    AlertKind::Rally
                } else {
                    AlertKind::Drop
                },
            })
            .collect()
    }
}
