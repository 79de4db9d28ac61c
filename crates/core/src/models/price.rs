use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anything that can answer "what is the current price of this symbol?".
///
/// `None` means no quote is known. The valuation engine treats that as a
/// price of 0 rather than failing.
pub trait PriceLookup {
    fn price_of(&self, symbol: &str) -> Option<f64>;
}

impl PriceLookup for HashMap<String, f64> {
    fn price_of(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).copied()
    }
}

impl<F> PriceLookup for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn price_of(&self, symbol: &str) -> Option<f64> {
        self(symbol)
    }
}

/// A single cached quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub fetched_on: NaiveDate,
}

/// Local cache of current prices, keyed by uppercased symbol.
///
/// A quote is considered fresh for the calendar day it was fetched on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteCache {
    pub entries: HashMap<String, Quote>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached price for `symbol` if it was fetched on `today`.
    pub fn fresh_price(&self, symbol: &str, today: NaiveDate) -> Option<f64> {
        self.entries
            .get(&symbol.to_uppercase())
            .filter(|q| q.fetched_on == today)
            .map(|q| q.price)
    }

    pub fn set_price(&mut self, symbol: &str, price: f64, today: NaiveDate) {
        self.entries.insert(
            symbol.to_uppercase(),
            Quote {
                price,
                fetched_on: today,
            },
        );
    }

    /// Drop quotes fetched before `today`. Returns how many were removed.
    pub fn prune_stale(&mut self, today: NaiveDate) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, q| q.fetched_on >= today);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Immutable set of current prices for one valuation run.
///
/// Built by [`PriceService::quote_snapshot`](crate::services::price_service::PriceService::quote_snapshot)
/// so the engine sees one consistent price per symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    prices: HashMap<String, f64>,
}

impl QuoteSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, price: f64) {
        self.prices.insert(symbol.to_uppercase(), price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, f64)> for QuoteSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (symbol, price) in iter {
            snapshot.insert(&symbol, price);
        }
        snapshot
    }
}

impl PriceLookup for QuoteSnapshot {
    fn price_of(&self, symbol: &str) -> Option<f64> {
        self.prices.get(&symbol.to_uppercase()).copied()
    }
}
