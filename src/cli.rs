//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::asset::Category;
use crate::domain::catalog::AssetCatalog;
use crate::domain::config_validation::{parse_date, validate_dashboard_config};
use crate::domain::error::DashboardError;
use crate::domain::generator::{DEFAULT_START_DATE, GeneratorConfig, SyntheticSeriesGenerator};
use crate::domain::history::{MarketHistory, Period};
use crate::domain::indicator_helpers::{IndicatorConfig, technical_table};
use crate::domain::metrics::{MarketSummary, VolatilityStats, volatility_stats};
use crate::domain::quote::{Alert, AlertKind, QuoteBoard, QuoteConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "cryptoboard", about = "Synthetic crypto market dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    /// Seed for reproducible output; overrides [generator] seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the asset catalog
    Assets {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        category: Option<String>,
    },
    /// Generate synthetic price history as CSV
    Generate {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long, default_value = "all")]
        period: Period,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Moving averages, RSI and Bollinger bands for one asset as CSV
    Indicators {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "1y")]
        period: Period,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show current quotes after a number of refresh ticks, then alerts
    Quotes {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, default_value_t = 1)]
        ticks: u32,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Market summary and volatility table
    Summary {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let mut stdout = io::stdout().lock();
    let result = match cli.command {
        Command::Assets { common, category } => {
            run_assets(&common, category.as_deref(), &mut stdout)
        }
        Command::Generate {
            common,
            symbol,
            period,
            output,
        } => run_generate(&common, symbol.as_deref(), period, output.as_deref(), &mut stdout),
        Command::Indicators {
            common,
            symbol,
            period,
            output,
        } => run_indicators(&common, &symbol, period, output.as_deref(), &mut stdout),
        Command::Quotes {
            common,
            ticks,
            threshold,
        } => run_quotes(&common, ticks, threshold, &mut stdout),
        Command::Summary { common } => run_summary(&common, &mut stdout),
        Command::Validate { config } => run_validate(&config, &mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, DashboardError> {
    FileConfigAdapter::from_file(path).map_err(|e| DashboardError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_generator_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<GeneratorConfig, DashboardError> {
    let (y, m, d) = DEFAULT_START_DATE;
    let default_start = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| DashboardError::invalid("generator", "start_date", "invalid default"))?;

    let start_date = match config.get_string("generator", "start_date") {
        Some(s) => parse_date(&s, "start_date")?,
        None => default_start,
    };
    let end_date = match config.get_string("generator", "end_date") {
        Some(s) => parse_date(&s, "end_date")?,
        None => today,
    };
    if start_date > end_date {
        return Err(DashboardError::invalid(
            "generator",
            "start_date",
            "start_date must be on or before end_date",
        ));
    }

    let seed = match config.get_string("generator", "seed") {
        Some(s) => Some(s.trim().parse::<u64>().map_err(|_| {
            DashboardError::invalid("generator", "seed", "seed must be a non-negative integer")
        })?),
        None => None,
    };

    Ok(GeneratorConfig {
        start_date,
        end_date,
        seed,
    })
}

pub fn build_indicator_config(config: &dyn ConfigPort) -> IndicatorConfig {
    let defaults = IndicatorConfig::default();
    let period = |key: &str, default: usize| {
        config.get_int("indicators", key, default as i64).max(1) as usize
    };
    IndicatorConfig {
        ma_short: period("ma_short", defaults.ma_short),
        ma_long: period("ma_long", defaults.ma_long),
        rsi_period: period("rsi_period", defaults.rsi_period),
        bollinger_period: period("bollinger_period", defaults.bollinger_period),
        bollinger_mult: config.get_double("indicators", "bollinger_mult", defaults.bollinger_mult),
    }
}

pub fn build_quote_config(config: &dyn ConfigPort) -> QuoteConfig {
    let defaults = QuoteConfig::default();
    QuoteConfig {
        alert_threshold: config.get_double("quotes", "alert_threshold", defaults.alert_threshold),
        change_probability: config.get_double(
            "quotes",
            "change_probability",
            defaults.change_probability,
        ),
        max_tick_move_pct: config.get_double(
            "quotes",
            "max_tick_move_pct",
            defaults.max_tick_move_pct,
        ),
        initial_move_pct: config.get_double(
            "quotes",
            "initial_move_pct",
            defaults.initial_move_pct,
        ),
    }
}

/// Everything one invocation needs, loaded and validated from a config file.
pub struct Session {
    pub catalog: AssetCatalog,
    pub generator: GeneratorConfig,
    pub indicators: IndicatorConfig,
    pub quotes: QuoteConfig,
    pub rng: StdRng,
}

impl Session {
    pub fn from_config(
        config: &dyn ConfigPort,
        seed_override: Option<u64>,
        today: NaiveDate,
    ) -> Result<Self, DashboardError> {
        validate_dashboard_config(config)?;
        let catalog = AssetCatalog::from_config(config)?;
        let generator = build_generator_config(config, today)?;
        let rng = match seed_override.or(generator.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            catalog,
            generator,
            indicators: build_indicator_config(config),
            quotes: build_quote_config(config),
            rng,
        })
    }

    pub fn load(common: &CommonArgs) -> Result<Self, DashboardError> {
        info!("Loading config from {}", common.config.display());
        let adapter = load_config(&common.config)?;
        Self::from_config(&adapter, common.seed, Local::now().date_naive())
    }

    pub fn generate_history(&mut self) -> MarketHistory {
        info!(
            "Generating {} assets from {} to {}",
            self.catalog.len(),
            self.generator.start_date,
            self.generator.end_date
        );
        SyntheticSeriesGenerator::default().generate_history(
            &self.catalog,
            self.generator.start_date,
            self.generator.end_date,
            &mut self.rng,
        )
    }

    pub fn open_board(&mut self, history: &MarketHistory) -> QuoteBoard {
        QuoteBoard::open(&self.catalog, history, &self.quotes, &mut self.rng)
    }
}

pub fn run_assets(
    common: &CommonArgs,
    category: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    let session = Session::load(common)?;
    let filter: Option<Category> = category.map(str::parse).transpose()?;
    write_assets(out, &session.catalog, filter)?;
    Ok(())
}

pub fn run_generate(
    common: &CommonArgs,
    symbol: Option<&str>,
    period: Period,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    let mut session = Session::load(common)?;
    if let Some(symbol) = symbol {
        session.catalog.get(symbol)?;
    }
    let history = session.generate_history().trailing(period, symbol)?;
    info!("{} points over period {}", history.point_count(), period);

    match output {
        Some(path) => {
            CsvAdapter::new().write_history(&history, &path.to_string_lossy())?;
            info!("History written to: {}", path.display());
        }
        None => csv_adapter::write_history_to(out, &history)?,
    }
    Ok(())
}

pub fn run_indicators(
    common: &CommonArgs,
    symbol: &str,
    period: Period,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    let mut session = Session::load(common)?;
    let asset_symbol = session.catalog.get(symbol)?.symbol.clone();
    let history = session.generate_history();

    // Indicators run over the full series so the period starts warmed up.
    let full = history.series(&asset_symbol)?;
    let rows = technical_table(&full.points, &session.indicators);
    let keep = history.within(&asset_symbol, period)?.len();
    let rows = &rows[rows.len() - keep..];

    match output {
        Some(path) => {
            CsvAdapter::new().write_technical(&asset_symbol, rows, &path.to_string_lossy())?;
            info!("Indicators written to: {}", path.display());
        }
        None => csv_adapter::write_technical_to(out, &asset_symbol, rows)?,
    }
    Ok(())
}

pub fn run_quotes(
    common: &CommonArgs,
    ticks: u32,
    threshold: Option<f64>,
    out: &mut dyn Write,
) -> Result<(), DashboardError> {
    if threshold.is_some_and(|t| t.is_nan() || t < 0.0) {
        return Err(DashboardError::invalid(
            "cli",
            "threshold",
            "threshold must be non-negative",
        ));
    }

    let mut session = Session::load(common)?;
    let history = session.generate_history();
    let mut board = session.open_board(&history);
    for _ in 0..ticks {
        board.tick(&session.quotes, &mut session.rng);
    }

    let threshold = threshold.unwrap_or(session.quotes.alert_threshold);
    write_quotes(out, &board)?;
    write_alerts(out, &board.alerts(threshold), threshold)?;
    Ok(())
}

pub fn run_summary(common: &CommonArgs, out: &mut dyn Write) -> Result<(), DashboardError> {
    let mut session = Session::load(common)?;
    let history = session.generate_history();
    let board = session.open_board(&history);
    let summary = MarketSummary::compute(&board).ok_or(DashboardError::EmptyCatalog)?;
    write_summary(out, &summary)?;
    write_volatility(out, &volatility_stats(&history))?;
    Ok(())
}

pub fn run_validate(config_path: &Path, out: &mut dyn Write) -> Result<(), DashboardError> {
    let adapter = load_config(config_path)?;
    validate_dashboard_config(&adapter)?;
    let catalog = AssetCatalog::from_config(&adapter)?;
    build_generator_config(&adapter, Local::now().date_naive())?;
    writeln!(
        out,
        "Config OK: {} assets in {} categories",
        catalog.len(),
        catalog.categories().len()
    )?;
    Ok(())
}

pub fn write_assets(
    out: &mut dyn Write,
    catalog: &AssetCatalog,
    category: Option<Category>,
) -> io::Result<()> {
    writeln!(
        out,
        "{:<11} {:<20} {:<11} {:>14} {:>7} {:>10} {:>18}",
        "SYMBOL", "NAME", "CATEGORY", "BASE PRICE", "VOL %", "VOLUME $B", "SUPPLY"
    )?;
    for asset in catalog.iter() {
        if category.is_some_and(|c| c != asset.category) {
            continue;
        }
        let supply = asset
            .total_supply
            .map(|s| format!("{s:.0}"))
            .unwrap_or_else(|| "uncapped".to_string());
        writeln!(
            out,
            "{:<11} {:<20} {:<11} {:>14.4} {:>7.1} {:>10.2} {:>18}",
            asset.symbol,
            asset.name,
            asset.category.to_string(),
            asset.base_price,
            asset.volatility,
            asset.daily_volume,
            supply
        )?;
    }
    Ok(())
}

pub fn write_quotes(out: &mut dyn Write, board: &QuoteBoard) -> io::Result<()> {
    writeln!(
        out,
        "{:<11} {:<11} {:>16} {:>8} {:>10} {:>12} {:>7}",
        "SYMBOL", "CATEGORY", "PRICE", "CHG %", "VOLUME $B", "MKT CAP $B", "SPREAD"
    )?;
    for q in board.quotes() {
        writeln!(
            out,
            "{:<11} {:<11} {:>16.4} {:>+8.2} {:>10.2} {:>12.1} {:>7.2}",
            q.symbol,
            q.category.to_string(),
            q.price,
            q.change_pct,
            q.daily_volume,
            q.market_cap,
            q.spread
        )?;
    }
    Ok(())
}

pub fn write_alerts(out: &mut dyn Write, alerts: &[Alert], threshold: f64) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== Alerts (|change| > {threshold:.2}%) ===")?;
    if alerts.is_empty() {
        writeln!(out, "  none")?;
    }
    for alert in alerts {
        let label = match alert.kind {
            AlertKind::Rally => "RALLY",
            AlertKind::Drop => "DROP ",
        };
        writeln!(out, "  {label} {}: {:+.2}%", alert.symbol, alert.change_pct)?;
    }
    Ok(())
}

pub fn write_summary(out: &mut dyn Write, summary: &MarketSummary) -> io::Result<()> {
    writeln!(out, "=== Market Summary ===")?;
    writeln!(out, "Average Change:   {:+.2}%", summary.avg_change_pct)?;
    writeln!(out, "Total Volume:     ${:.1}B", summary.total_volume)?;
    writeln!(out, "Total Market Cap: ${:.0}B", summary.total_market_cap)?;
    writeln!(
        out,
        "Strongest:        {} {:+.2}%",
        summary.strongest.0, summary.strongest.1
    )?;
    writeln!(
        out,
        "Weakest:          {} {:+.2}%",
        summary.weakest.0, summary.weakest.1
    )?;

    writeln!(out, "\n=== By Category ===")?;
    for c in &summary.categories {
        writeln!(
            out,
            "  {:<11} {:>3} assets  {:>+7.2}%  ${:.1}B",
            c.category.to_string(),
            c.count,
            c.avg_change_pct,
            c.market_cap
        )?;
    }
    Ok(())
}

pub fn write_volatility(out: &mut dyn Write, stats: &[VolatilityStats]) -> io::Result<()> {
    writeln!(out, "\n=== Volatility ===")?;
    writeln!(out, "{:<11} {:>12} {:>12}", "SYMBOL", "MEAN %", "RECENT SD")?;
    for s in stats {
        let recent = s
            .recent_dispersion
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "{:<11} {:>12.3} {:>12}", s.symbol, s.mean_intraday, recent)?;
    }
    Ok(())
}
