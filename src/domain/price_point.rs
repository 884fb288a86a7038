//! Daily price point representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub symbol: String,
    pub price: f64,
    /// Traded volume in USD.
    pub volume: f64,
    /// |noise - 1| * 100 for the day's noise factor.
    pub intraday_volatility: f64,
}
