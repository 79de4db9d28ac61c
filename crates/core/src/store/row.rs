use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::holding::{BrokerId, HoldingId, RawHolding, StockId, UserId};
use crate::models::price::QuoteSnapshot;

/// A holding row as exported by an external store or an older schema.
///
/// Field names drifted over time (`invested` vs `buy_price`, `current` vs
/// `current_price`, `portfolio_id` vs `holding_id`). This adapter accepts
/// every known spelling and converts to the canonical [`RawHolding`] once,
/// at the store boundary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HoldingRow {
    #[serde(alias = "holding_id", alias = "portfolio_id")]
    pub id: HoldingId,
    pub user_id: UserId,

    pub broker_id: BrokerId,
    #[serde(default)]
    pub broker_name: Option<String>,

    pub stock_id: StockId,
    #[serde(default, alias = "symbol")]
    pub stock_symbol: Option<String>,
    #[serde(default)]
    pub stock_name: Option<String>,

    pub quantity: f64,

    /// Buy price per share, under either name.
    #[serde(alias = "buy_price")]
    pub invested: f64,

    /// Current price if the row was joined with a price column.
    #[serde(default, alias = "current")]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_edited: Option<DateTime<Utc>>,
}

impl HoldingRow {
    /// Normalize into the canonical shape.
    ///
    /// Blank broker names become `None`, symbols are uppercased and a
    /// missing stock name falls back to the symbol.
    pub fn into_raw(self) -> RawHolding {
        let broker_name = self
            .broker_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let stock_symbol = self
            .stock_symbol
            .unwrap_or_default()
            .trim()
            .to_uppercase();
        let stock_name = self
            .stock_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| stock_symbol.clone());

        RawHolding {
            id: self.id,
            user_id: self.user_id,
            broker_id: self.broker_id,
            broker_name,
            stock_id: self.stock_id,
            stock_symbol,
            stock_name,
            quantity: self.quantity,
            invested: self.invested,
            date_created: self.date_created,
            date_edited: self.date_edited,
        }
    }
}

/// Normalize a batch of rows, collecting any joined-in prices into a
/// snapshot usable by the valuation engine.
pub fn normalize_rows(rows: Vec<HoldingRow>) -> (Vec<RawHolding>, QuoteSnapshot) {
    let mut quotes = QuoteSnapshot::new();
    let holdings = rows
        .into_iter()
        .map(|row| {
            let price = row.current_price.filter(|p| p.is_finite() && *p >= 0.0);
            let raw = row.into_raw();
            if let Some(price) = price {
                quotes.insert(&raw.stock_symbol, price);
            }
            raw
        })
        .collect();
    (holdings, quotes)
}

/// Parse and normalize a JSON array of rows.
pub fn rows_from_json(json: &str) -> Result<(Vec<RawHolding>, QuoteSnapshot), crate::errors::CoreError> {
    let rows: Vec<HoldingRow> = serde_json::from_str(json)?;
    Ok(normalize_rows(rows))
}
