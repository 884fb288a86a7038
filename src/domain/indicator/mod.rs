//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Every series has one point per input price. Points inside the warmup, or
//! where the indicator has no signal, are marked invalid.

pub mod bollinger;
pub mod rsi;
pub mod sma;
pub mod stddev;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    pub(crate) fn invalid(date: NaiveDate, value: IndicatorValue) -> Self {
        Self {
            date,
            valid: false,
            value,
        }
    }

    /// The scalar value, if this point is valid and single-valued.
    pub fn simple(&self) -> Option<f64> {
        match (self.valid, &self.value) {
            (true, IndicatorValue::Simple(v)) => Some(*v),
            _ => None,
        }
    }

    /// `(upper, middle, lower)` for a valid Bollinger point.
    pub fn bands(&self) -> Option<(f64, f64, f64)> {
        match (self.valid, &self.value) {
            (
                true,
                IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                },
            ) => Some((*upper, *middle, *lower)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Bollinger { upper: f64, middle: f64, lower: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    Stddev(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl IndicatorType {
    pub fn bollinger(period: usize, multiplier: f64) -> Self {
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100: (multiplier * 100.0).round().max(0.0) as u32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }

    pub fn first_valid_index(&self) -> Option<usize> {
        self.values.iter().position(|p| p.valid)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}
