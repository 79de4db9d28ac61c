use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::price::{QuoteCache, QuoteSnapshot};
use crate::providers::registry::PriceProviderRegistry;

/// Fetches current stock prices from providers with per-day caching.
///
/// Cache strategy: a quote fetched today is reused for the rest of the
/// day; `invalidate()` forces a refetch. Unknown symbols are left out of
/// the snapshot (the valuation engine prices them at 0). Only a real outage
/// (every provider failing for reasons other than "no such symbol") is an
/// error.
///
/// **Note on precision**: prices are `f64`. No rounding happens here.
pub struct PriceService {
    registry: PriceProviderRegistry,
    cache: QuoteCache,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self {
            registry,
            cache: QuoteCache::new(),
        }
    }

    /// Swap the provider list. Cached quotes came from the old providers,
    /// so they are dropped.
    pub fn replace_registry(&mut self, registry: PriceProviderRegistry) {
        self.registry = registry;
        self.cache.clear();
    }

    /// Names of the registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Forget all cached quotes.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Current prices for `symbols`, as of today (UTC).
    pub async fn quote_snapshot<'a, I>(&mut self, symbols: I) -> Result<QuoteSnapshot, CoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let today = chrono::Utc::now().date_naive();
        self.quote_snapshot_at(symbols, today).await
    }

    /// Current prices for `symbols`, treating `today` as the cache day.
    ///
    /// 1. Reuse a quote cached on `today`.
    /// 2. Otherwise ask providers in order, caching the first valid price.
    /// 3. Symbols nobody can price are omitted.
    pub async fn quote_snapshot_at<'a, I>(
        &mut self,
        symbols: I,
        today: NaiveDate,
    ) -> Result<QuoteSnapshot, CoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.cache.prune_stale(today);

        let mut snapshot = QuoteSnapshot::new();
        let mut seen = HashSet::new();
        for symbol in symbols {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() || !seen.insert(symbol.clone()) {
                continue;
            }

            if let Some(price) = self.cache.fresh_price(&symbol, today) {
                snapshot.insert(&symbol, price);
                continue;
            }

            match self.fetch_price(&symbol).await? {
                Some(price) => {
                    self.cache.set_price(&symbol, price, today);
                    snapshot.insert(&symbol, price);
                }
                None => warn!("no price available for {symbol}, valuing at 0"),
            }
        }

        debug!("quote snapshot: {} symbols priced", snapshot.len());
        Ok(snapshot)
    }

    /// Ask providers in registration order for one symbol.
    ///
    /// `Ok(None)` when at least one provider answered "unknown symbol" (or
    /// gave an unusable price) and none gave a valid one. `Err` when every
    /// provider failed outright.
    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>, CoreError> {
        if self.registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut not_available = false;
        let mut last_error = None;

        for provider in self.registry.providers() {
            match provider.get_current_price(symbol).await {
                Ok(price) if price.is_finite() && price >= 0.0 => return Ok(Some(price)),
                Ok(price) => {
                    warn!(
                        "{} returned invalid price for {symbol}: {price}",
                        provider.name()
                    );
                    not_available = true;
                }
                Err(e) if e.is_price_not_available() => not_available = true,
                Err(e) => {
                    warn!("{} failed for {symbol}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !not_available => Err(e),
            _ => Ok(None),
        }
    }
}
