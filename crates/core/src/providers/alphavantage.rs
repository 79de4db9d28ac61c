use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::PriceProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage API provider for stock quotes.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (set via settings as "alphavantage").
/// - **Coverage**: 100k+ global equity symbols.
///
/// Prices are in the listing's native currency (typically USD).
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

/// Pull the price out of a GLOBAL_QUOTE payload.
///
/// An empty `"Global Quote": {}` means the symbol is unknown. A `Note` or
/// `Information` field means the key is throttled, which is an outage.
fn parse_global_quote(symbol: &str, resp: GlobalQuoteResponse) -> Result<f64, CoreError> {
    if let Some(message) = resp.note.or(resp.information) {
        return Err(CoreError::Api {
            provider: PROVIDER.into(),
            message,
        });
    }

    let price_str = resp
        .global_quote
        .and_then(|q| q.price)
        .ok_or_else(|| CoreError::PriceNotAvailable {
            symbol: symbol.to_string(),
        })?;

    price_str.trim().parse().map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Invalid price format for {symbol}: {e}"),
    })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp: GlobalQuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        parse_global_quote(symbol, resp)
    }
}
