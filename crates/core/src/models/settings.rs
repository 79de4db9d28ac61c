use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tracker configuration, stored alongside the data in a store snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "alphavantage").
    /// Values: the API key string.
    pub api_keys: HashMap<String, String>,

    /// Query live market data providers (Yahoo Finance, Alpha Vantage).
    /// When off, only catalog reference prices are used.
    #[serde(default)]
    pub use_live_prices: bool,

    /// Price quoted for symbols missing from the catalog table.
    /// `None` leaves them unpriced (valued at 0).
    #[serde(default)]
    pub static_price_fallback: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_keys: HashMap::new(),
            use_live_prices: false,
            static_price_fallback: None,
        }
    }
}
