//! Report output port trait.

use crate::domain::error::DashboardError;
use crate::domain::history::MarketHistory;
use crate::domain::indicator_helpers::TechnicalRow;

/// Port for writing generated tables.
pub trait ReportPort {
    fn write_history(
        &self,
        history: &MarketHistory,
        output_path: &str,
    ) -> Result<(), DashboardError>;

    fn write_technical(
        &self,
        symbol: &str,
        rows: &[TechnicalRow],
        output_path: &str,
    ) -> Result<(), DashboardError>;
}
