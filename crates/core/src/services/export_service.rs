use crate::errors::CoreError;
use crate::models::analytics::EnrichedHolding;

/// File name offered to the browser for the download.
pub const EXPORT_FILE_NAME: &str = "portfolio.csv";

/// Column order of the export. Fixed; downstream spreadsheets rely on it.
pub const CSV_HEADER: [&str; 10] = [
    "Symbol",
    "Name",
    "Broker",
    "Quantity",
    "Buy Price",
    "Current Price",
    "Cost",
    "Value",
    "P&L",
    "P&L%",
];

/// Serializes enriched holdings to CSV. Formatting only, no valuation logic.
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// One header row, then one row per holding in the given order.
    /// Quantity is written as stored; money columns use two decimals and
    /// P&L% carries a `%` suffix.
    pub fn export_csv(&self, holdings: &[EnrichedHolding]) -> Result<String, CoreError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;

        for h in holdings {
            writer.write_record([
                h.holding.stock_symbol.clone(),
                h.holding.stock_name.clone(),
                h.broker_label().to_string(),
                h.holding.quantity.to_string(),
                format!("{:.2}", h.holding.invested),
                format!("{:.2}", h.current),
                format!("{:.2}", h.cost),
                format!("{:.2}", h.value),
                format!("{:.2}", h.pnl),
                format!("{:.2}%", h.pnl_percent),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| CoreError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CoreError::Csv(e.to_string()))
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}
