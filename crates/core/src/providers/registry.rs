use std::collections::HashMap;

use crate::models::catalog::Stock;
use crate::models::settings::Settings;

use super::alphavantage::AlphaVantageProvider;
use super::static_table::StaticPriceProvider;
use super::traits::PriceProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered list of price providers. Earlier registrations are asked first;
/// later ones act as fallbacks.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry from settings and the current stock catalog.
    ///
    /// With live prices enabled: Yahoo Finance (no key), then Alpha Vantage
    /// (if an "alphavantage" key is set). The static catalog table is always
    /// registered last so reference prices back up the live sources.
    pub fn new_with_defaults(settings: &Settings, stocks: &[Stock]) -> Self {
        let mut registry = Self::new();

        if settings.use_live_prices {
            // Not available on WASM (uses native reqwest/tokio connectors)
            #[cfg(not(target_arch = "wasm32"))]
            {
                match YahooFinanceProvider::new() {
                    Ok(yahoo) => registry.register(Box::new(yahoo)),
                    Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
                }
            }

            if let Some(key) = settings.api_keys.get("alphavantage") {
                registry.register(Box::new(AlphaVantageProvider::new(key.clone())));
            }
        }

        registry.register(Box::new(StaticPriceProvider::from_stocks(
            stocks,
            settings.static_price_fallback,
        )));

        registry
    }

    /// Registry with a single static table and no live sources.
    pub fn with_static_prices(prices: HashMap<String, f64>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(StaticPriceProvider::new(prices, None)));
        registry
    }

    /// Register a new price provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// All providers in priority order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn PriceProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
