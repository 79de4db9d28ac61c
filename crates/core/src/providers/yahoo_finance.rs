use async_trait::async_trait;

use crate::errors::CoreError;
use super::traits::PriceProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance provider for stock quotes.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Uses the `yahoo_finance_api` crate, which wraps Yahoo's public
/// endpoints. Not WASM-compatible.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        // A chart with no quotes in it means Yahoo does not know the ticker.
        let quote = resp
            .last_quote()
            .map_err(|_| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
            })?;

        Ok(quote.close)
    }
}
