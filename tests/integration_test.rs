//! End-to-end tests over the domain layer.
//!
//! Tests cover:
//! - Full history generation from an INI-defined catalog
//! - Calendar continuity and price positivity across every asset
//! - Stablecoin peg over trailing windows
//! - Technical table over generated data
//! - Quote board refresh, alerts and market summary

mod common;

use common::*;
use cryptoboard::domain::asset::Category;
use cryptoboard::domain::generator::SyntheticSeriesGenerator;
use cryptoboard::domain::history::{MarketHistory, Period};
use cryptoboard::domain::indicator_helpers::{IndicatorConfig, technical_table};
use cryptoboard::domain::metrics::{MarketSummary, volatility_stats};
use cryptoboard::domain::quote::{AlertKind, QuoteBoard, QuoteConfig};

fn generate(seed: u64) -> MarketHistory {
    SyntheticSeriesGenerator::default().generate_history(
        &sample_catalog(),
        date(2024, 1, 1),
        date(2024, 6, 30),
        &mut rng(seed),
    )
}

mod history_generation {
    use super::*;

    #[test]
    fn every_asset_has_one_point_per_day() {
        let history = generate(1);
        assert_eq!(history.all().len(), 4);
        for series in history.all() {
            // 2024 is a leap year: Jan 31 + Feb 29 + Mar 31 + Apr 30 + May 31 + Jun 30
            assert_eq!(series.points.len(), 182, "{}", series.asset.symbol);
            for pair in series.points.windows(2) {
                assert_eq!((pair[1].date - pair[0].date).num_days(), 1);
            }
            assert_eq!(series.points.first().unwrap().date, date(2024, 1, 1));
            assert_eq!(series.points.last().unwrap().date, date(2024, 6, 30));
        }
    }

    #[test]
    fn prices_and_volumes_stay_positive() {
        for seed in 0..5 {
            let history = generate(seed);
            for series in history.all() {
                for p in &series.points {
                    assert!(p.price > 0.0, "{} on {}", p.symbol, p.date);
                    assert!(p.volume > 0.0);
                    assert!(p.intraday_volatility >= 0.0);
                    assert_eq!(p.symbol, series.asset.symbol);
                }
            }
        }
    }

    #[test]
    fn same_seed_reproduces_history() {
        assert_eq!(generate(99), generate(99));
        assert_ne!(generate(99), generate(100));
    }

    #[test]
    fn stablecoin_stays_pegged_over_trailing_month() {
        for seed in 0..5 {
            let history = generate(seed);
            let points = history.within("USDT/USD", Period::OneMonth).unwrap();
            assert_eq!(points.len(), 30);
            for p in points {
                assert!(
                    (0.97..=1.03).contains(&p.price),
                    "seed {seed}: {} on {}",
                    p.price,
                    p.date
                );
            }
        }
    }

    #[test]
    fn catalog_order_is_category_then_symbol() {
        let history = generate(3);
        let symbols: Vec<&str> = history.all().iter().map(|s| s.asset.symbol.as_str()).collect();
        assert_eq!(symbols, ["BTC/USD", "UNI/USD", "DOGE/USD", "USDT/USD"]);
    }
}

mod technical_analysis {
    use super::*;

    #[test]
    fn table_over_generated_series() {
        let history = generate(5);
        let series = history.series("btc/usd").unwrap();
        let config = IndicatorConfig {
            ma_short: 5,
            ma_long: 20,
            ..IndicatorConfig::default()
        };
        let rows = technical_table(&series.points, &config);
        assert_eq!(rows.len(), series.points.len());

        assert!(rows[3].ma_short.is_none());
        assert!(rows[4].ma_short.is_some());
        assert!(rows[18].ma_long.is_none());
        assert!(rows[19].ma_long.is_some());
        assert!(rows[13].rsi.is_none());

        for row in &rows {
            if let Some(rsi) = row.rsi {
                assert!((0.0..=100.0).contains(&rsi));
            }
            if let Some((upper, middle, lower)) = row.bollinger {
                assert!(upper >= middle && middle >= lower);
            }
        }
    }
}

mod quotes_and_summary {
    use super::*;

    #[test]
    fn board_opens_near_last_close() {
        let history = generate(11);
        let config = QuoteConfig::default();
        let board = QuoteBoard::open(&sample_catalog(), &history, &config, &mut rng(11));
        assert_eq!(board.quotes().len(), 4);
        for quote in board.quotes() {
            let last = history.last_point(&quote.symbol).unwrap().price;
            let ratio = quote.price / last;
            assert!((0.95..=1.05).contains(&ratio), "{}: {ratio}", quote.symbol);
            assert!(quote.change_pct.abs() <= config.initial_move_pct);
            assert!((0.01..=0.5).contains(&quote.spread));
        }
    }

    #[test]
    fn ticks_bound_each_move() {
        let history = generate(12);
        let config = QuoteConfig::default();
        let mut r = rng(12);
        let mut board = QuoteBoard::open(&sample_catalog(), &history, &config, &mut r);
        for _ in 0..50 {
            let before = board.clone();
            board.tick(&config, &mut r);
            for (old, new) in before.quotes().iter().zip(board.quotes()) {
                let moved = (new.price / old.price - 1.0) * 100.0;
                assert!(moved.abs() <= config.max_tick_move_pct + 1e-9);
                assert!(new.price > 0.0);
            }
        }
        assert_eq!(board.ticks(), 50);
    }

    #[test]
    fn alerts_follow_threshold() {
        let history = generate(13);
        let mut board =
            QuoteBoard::open(&sample_catalog(), &history, &QuoteConfig::default(), &mut rng(13));
        board.tick(&QuoteConfig::default(), &mut rng(14));

        assert!(board.alerts(100.0).is_empty());
        let all = board.alerts(0.0);
        for alert in &all {
            assert!(alert.change_pct != 0.0);
            match alert.kind {
                AlertKind::Rally => assert!(alert.change_pct > 0.0),
                AlertKind::Drop => assert!(alert.change_pct < 0.0),
            }
        }
    }

    #[test]
    fn summary_over_board() {
        let history = generate(21);
        let board =
            QuoteBoard::open(&sample_catalog(), &history, &QuoteConfig::default(), &mut rng(21));
        let summary = MarketSummary::compute(&board).unwrap();

        assert!((summary.total_volume - (30.0 + 0.4 + 0.9 + 45.0)).abs() < 1e-9);
        let categories: Vec<Category> = summary.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            [Category::Major, Category::DeFi, Category::Meme, Category::Stablecoin]
        );
        assert!(summary.strongest.1 >= summary.weakest.1);
        assert!(summary.total_market_cap > 0.0);
    }

    #[test]
    fn volatility_table_covers_every_asset() {
        let history = generate(22);
        let stats = volatility_stats(&history);
        assert_eq!(stats.len(), 4);
        let btc = stats.iter().find(|s| s.symbol == "BTC/USD").unwrap();
        let usdt = stats.iter().find(|s| s.symbol == "USDT/USD").unwrap();
        assert!(btc.mean_intraday > usdt.mean_intraday);
        assert!(btc.recent_dispersion.is_some());
    }
}
