//! Market-wide metrics and per-asset volatility statistics.

use crate::domain::asset::Category;
use crate::domain::history::MarketHistory;
use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::quote::QuoteBoard;

/// Days covered by the "recent" volatility window.
pub const RECENT_VOLATILITY_DAYS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub count: usize,
    pub avg_change_pct: f64,
    pub market_cap: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    pub avg_change_pct: f64,
    /// Billions of USD.
    pub total_volume: f64,
    /// Billions of USD.
    pub total_market_cap: f64,
    pub strongest: (String, f64),
    pub weakest: (String, f64),
    pub categories: Vec<CategoryBreakdown>,
}

impl MarketSummary {
    /// `None` for an empty board.
    pub fn compute(board: &QuoteBoard) -> Option<Self> {
        let quotes = board.quotes();
        if quotes.is_empty() {
            return None;
        }

        let n = quotes.len() as f64;
        let avg_change_pct = quotes.iter().map(|q| q.change_pct).sum::<f64>() / n;
        let total_volume = quotes.iter().map(|q| q.daily_volume).sum();
        let total_market_cap = quotes.iter().map(|q| q.market_cap).sum();

        let mut strongest = &quotes[0];
        let mut weakest = &quotes[0];
        for quote in &quotes[1..] {
            if quote.change_pct > strongest.change_pct {
                strongest = quote;
            }
            if quote.change_pct < weakest.change_pct {
                weakest = quote;
            }
        }

        let mut categories: Vec<CategoryBreakdown> = Vec::new();
        for category in Category::ALL {
            let members: Vec<_> = quotes.iter().filter(|q| q.category == category).collect();
            if members.is_empty() {
                continue;
            }
            let count = members.len();
            categories.push(CategoryBreakdown {
                category,
                count,
                avg_change_pct: members.iter().map(|q| q.change_pct).sum::<f64>() / count as f64,
                market_cap: members.iter().map(|q| q.market_cap).sum(),
            });
        }

        Some(Self {
            avg_change_pct,
            total_volume,
            total_market_cap,
            strongest: (strongest.symbol.clone(), strongest.change_pct),
            weakest: (weakest.symbol.clone(), weakest.change_pct),
            categories,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityStats {
    pub symbol: String,
    /// Mean intraday volatility over the full history, in percent.
    pub mean_intraday: f64,
    /// Sample stddev of intraday volatility over the trailing window.
    pub recent_dispersion: Option<f64>,
}

/// Volatility statistics for every series in `history`, in history order.
pub fn volatility_stats(history: &MarketHistory) -> Vec<VolatilityStats> {
    history
        .all()
        .iter()
        .filter(|s| !s.points.is_empty())
        .map(|s| {
            let intraday: Vec<f64> = s.points.iter().map(|p| p.intraday_volatility).collect();
            let mean_intraday = intraday.iter().sum::<f64>() / intraday.len() as f64;
            let recent_start = intraday.len().saturating_sub(RECENT_VOLATILITY_DAYS);
            VolatilityStats {
                symbol: s.asset.symbol.clone(),
                mean_intraday,
                recent_dispersion: sample_stddev(&intraday[recent_start..]),
            }
        })
        .collect()
}
