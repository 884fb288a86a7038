//! CSV report adapter.
//!
//! History columns: `date,symbol,category,price,volume,intraday_volatility`.
//! Technical columns: `date,symbol,price,ma_short,ma_long,rsi,bollinger_upper,
//! bollinger_middle,bollinger_lower`; undefined indicator values are empty cells.

use crate::domain::error::DashboardError;
use crate::domain::history::MarketHistory;
use crate::domain::indicator_helpers::TechnicalRow;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::io::Write;
use std::path::Path;

const HISTORY_HEADER: [&str; 6] = [
    "date",
    "symbol",
    "category",
    "price",
    "volume",
    "intraday_volatility",
];

const TECHNICAL_HEADER: [&str; 9] = [
    "date",
    "symbol",
    "price",
    "ma_short",
    "ma_long",
    "rsi",
    "bollinger_upper",
    "bollinger_middle",
    "bollinger_lower",
];

#[derive(Debug, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }
}

pub fn write_history_to<W: Write>(writer: W, history: &MarketHistory) -> Result<(), DashboardError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HISTORY_HEADER)?;
    for series in history.all() {
        let category = series.asset.category.to_string();
        for point in &series.points {
            wtr.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                point.symbol.clone(),
                category.clone(),
                format_number(point.price),
                format!("{:.0}", point.volume),
                format!("{:.4}", point.intraday_volatility),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_technical_to<W: Write>(
    writer: W,
    symbol: &str,
    rows: &[TechnicalRow],
) -> Result<(), DashboardError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(TECHNICAL_HEADER)?;
    for row in rows {
        let (upper, middle, lower) = match row.bollinger {
            Some((u, m, l)) => (Some(u), Some(m), Some(l)),
            None => (None, None, None),
        };
        wtr.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            symbol.to_string(),
            format_number(row.price),
            format_optional(row.ma_short),
            format_optional(row.ma_long),
            format_optional(row.rsi),
            format_optional(upper),
            format_optional(middle),
            format_optional(lower),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_number(value: f64) -> String {
    format!("{:.6}", value)
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

fn create_output(output_path: &str) -> Result<fs::File, DashboardError> {
    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::File::create(path)?)
}

impl ReportPort for CsvAdapter {
    fn write_history(&self, history: &MarketHistory, output_path: &str) -> Result<(), DashboardError> {
        write_history_to(create_output(output_path)?, history)
    }

    fn write_technical(
        &self,
        symbol: &str,
        rows: &[TechnicalRow],
        output_path: &str,
    ) -> Result<(), DashboardError> {
        write_technical_to(create_output(output_path)?, symbol, rows)
    }
}
