use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::catalog::Stock;

use super::traits::PriceProvider;

/// Quotes from a fixed symbol → price table.
///
/// Backed by the stock catalog's reference prices. Used offline, in demos
/// and tests, and as the last fallback behind live providers. An optional
/// default price answers for symbols missing from the table.
pub struct StaticPriceProvider {
    prices: HashMap<String, f64>,
    default_price: Option<f64>,
}

impl StaticPriceProvider {
    pub fn new(prices: HashMap<String, f64>, default_price: Option<f64>) -> Self {
        let prices = prices
            .into_iter()
            .map(|(symbol, price)| (symbol.to_uppercase(), price))
            .collect();
        Self {
            prices,
            default_price,
        }
    }

    pub fn from_stocks(stocks: &[Stock], default_price: Option<f64>) -> Self {
        let prices = stocks
            .iter()
            .map(|s| (s.stock_symbol.clone(), s.price))
            .collect();
        Self::new(prices, default_price)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for StaticPriceProvider {
    fn name(&self) -> &str {
        "Static table"
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        self.prices
            .get(&symbol.to_uppercase())
            .copied()
            .or(self.default_price)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
            })
    }
}
