use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::holding::{BrokerId, StockId};

/// A tradable stock in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub stock_id: StockId,
    pub stock_name: String,
    /// Ticker symbol, uppercased (e.g., "AAPL").
    pub stock_symbol: String,
    /// Last known price, used by the static quote table when live
    /// prices are disabled or unavailable.
    pub price: f64,
}

impl Stock {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            stock_id: Uuid::new_v4(),
            stock_name: name.into(),
            stock_symbol: symbol.into().trim().to_uppercase(),
            price,
        }
    }
}

/// A broker / trading platform a holding is kept at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Broker {
    pub broker_id: BrokerId,
    pub broker_name: String,
    #[serde(default)]
    pub broker_logo: String,
}

impl Broker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            broker_id: Uuid::new_v4(),
            broker_name: name.into(),
            broker_logo: String::new(),
        }
    }

    pub fn with_logo(name: impl Into<String>, logo: impl Into<String>) -> Self {
        Self {
            broker_logo: logo.into(),
            ..Self::new(name)
        }
    }
}

/// Starter catalog of well-known stocks with reference prices.
pub fn default_stocks() -> Vec<Stock> {
    vec![
        Stock::new("AAPL", "Apple Inc.", 175.23),
        Stock::new("MSFT", "Microsoft Corp", 412.85),
        Stock::new("GOOGL", "Google LLC", 153.40),
        Stock::new("AMZN", "Amazon Inc.", 168.92),
        Stock::new("TSLA", "Tesla Inc.", 238.15),
        Stock::new("NVDA", "NVIDIA Corp", 612.50),
    ]
}

/// Starter list of brokers.
pub fn default_brokers() -> Vec<Broker> {
    vec![
        Broker::new("Interactive Brokers"),
        Broker::new("Moomoo"),
        Broker::new("Forex"),
        Broker::new("Charles Schwab"),
    ]
}
