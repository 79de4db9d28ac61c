use async_trait::async_trait;

use crate::errors::CoreError;

/// Trait abstraction for all current-price sources (the "Price Oracle").
///
/// Each quote source (Yahoo Finance, Alpha Vantage, the static catalog
/// table) implements this trait. Swapping or adding a source touches only
/// its implementation and the registry.
///
/// Implementations report an unknown symbol with
/// [`CoreError::PriceNotAvailable`]; any other error is treated as the
/// source being unreachable.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the current (latest) price per share of a stock symbol.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;
}
