//! Configuration validation.
//!
//! Validates the `[generator]`, `[indicators]` and `[quotes]` sections before
//! any typed configuration is built from them. Asset sections are validated
//! by the catalog loader.

use crate::domain::error::DashboardError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_dashboard_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    validate_generator_config(config)?;
    validate_indicator_config(config)?;
    validate_quote_config(config)?;
    Ok(())
}

pub fn validate_generator_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let start = optional_date(config, "start_date")?;
    let end = optional_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(DashboardError::invalid(
                "generator",
                "start_date",
                "start_date must be on or before end_date",
            ));
        }
    }

    if let Some(seed) = config.get_string("generator", "seed") {
        if seed.trim().parse::<u64>().is_err() {
            return Err(DashboardError::invalid(
                "generator",
                "seed",
                "seed must be a non-negative integer",
            ));
        }
    }
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    for key in ["ma_short", "ma_long", "rsi_period"] {
        validate_period(config, key, 1)?;
    }
    validate_period(config, "bollinger_period", 2)?;

    let mult = number(config, "indicators", "bollinger_mult", 2.0)?;
    if !(mult > 0.0 && mult.is_finite()) {
        return Err(DashboardError::invalid(
            "indicators",
            "bollinger_mult",
            "bollinger_mult must be positive",
        ));
    }
    Ok(())
}

pub fn validate_quote_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let threshold = number(config, "quotes", "alert_threshold", 3.0)?;
    if threshold < 0.0 {
        return Err(DashboardError::invalid(
            "quotes",
            "alert_threshold",
            "alert_threshold must be non-negative",
        ));
    }

    let probability = number(config, "quotes", "change_probability", 0.7)?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(DashboardError::invalid(
            "quotes",
            "change_probability",
            "change_probability must be between 0 and 1",
        ));
    }

    for key in ["max_tick_move_pct", "initial_move_pct"] {
        let value = number(config, "quotes", key, 1.0)?;
        if !(0.0..100.0).contains(&value) {
            return Err(DashboardError::invalid(
                "quotes",
                key,
                format!("{key} must be in [0, 100)"),
            ));
        }
    }
    Ok(())
}

fn validate_period(config: &dyn ConfigPort, key: &str, minimum: i64) -> Result<(), DashboardError> {
    let Some(raw) = config.get_string("indicators", key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v >= minimum => Ok(()),
        _ => Err(DashboardError::invalid(
            "indicators",
            key,
            format!("{key} must be an integer >= {minimum}"),
        )),
    }
}

/// Parsed value of a float key, `default` when absent.
fn number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, DashboardError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DashboardError::invalid(
            section,
            key,
            format!("'{raw}' is not a number"),
        )),
    }
}

fn optional_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, DashboardError> {
    match config.get_string("generator", key) {
        None => Ok(None),
        Some(s) => parse_date(&s, key).map(Some),
    }
}

pub fn parse_date(value: &str, key: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        DashboardError::invalid(
            "generator",
            key,
            "invalid date format (expected YYYY-MM-DD)",
        )
    })
}
