pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

use models::{
    analytics::Dashboard,
    book::PortfolioBook,
    catalog::{default_brokers, default_stocks, Broker, Stock},
    holding::{BrokerId, HoldingId, HoldingUpdate, NewHolding, RawHolding, StockId, UserId},
    settings::Settings,
    user::{ProfileUpdate, UserProfile},
};
use providers::registry::PriceProviderRegistry;
use services::{
    auth_service::AuthService, export_service::ExportService, holding_service::HoldingService,
    price_service::PriceService, valuation_service::ValuationService,
};
use store::manager::StorageManager;
use store::memory::InMemoryStore;
use store::traits::{CatalogStore, HoldingStore};

use errors::CoreError;

/// Main entry point for the stock portfolio tracker core library.
/// Holds the store and all services needed to operate on it.
///
/// Every user-scoped operation takes the caller's verified [`UserId`];
/// the HTTP layer is responsible for authenticating requests.
#[must_use]
pub struct PortfolioTracker {
    store: InMemoryStore,
    auth_service: AuthService,
    holding_service: HoldingService,
    price_service: PriceService,
    valuation_service: ValuationService,
    export_service: ExportService,
    /// Set when the caller supplied its own registry; settings and catalog
    /// changes then leave it alone.
    custom_registry: bool,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let book = self.store.book();
        f.debug_struct("PortfolioTracker")
            .field("users", &book.users.len())
            .field("stocks", &book.stocks.len())
            .field("brokers", &book.brokers.len())
            .field("holdings", &book.holdings.len())
            .field("settings", &book.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PortfolioTracker {
    /// Create an empty tracker with default settings and no catalog.
    pub fn create_new() -> Self {
        Self::build(PortfolioBook::default())
    }

    /// Create a tracker pre-filled with a starter stock and broker catalog.
    pub fn with_default_catalog() -> Self {
        Self::build(PortfolioBook {
            stocks: default_stocks(),
            brokers: default_brokers(),
            ..PortfolioBook::default()
        })
    }

    /// Build around an existing book (e.g., one loaded elsewhere).
    pub fn from_book(book: PortfolioBook) -> Self {
        Self::build(book)
    }

    /// Replace the password hashing service (e.g., lighter Argon2 costs).
    pub fn with_auth_service(mut self, auth_service: AuthService) -> Self {
        self.auth_service = auth_service;
        self
    }

    /// Replace the provider registry, bypassing the settings-driven defaults.
    pub fn with_price_registry(mut self, registry: PriceProviderRegistry) -> Self {
        self.price_service.replace_registry(registry);
        self.custom_registry = true;
        self
    }

    /// Load a tracker from snapshot bytes.
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let book = StorageManager::load_from_bytes(data)?;
        Ok(Self::build(book))
    }

    /// Save the current state to snapshot bytes.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(self.store.book())?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from a snapshot file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let book = StorageManager::load_from_file(path)?;
        Ok(Self::build(book))
    }

    /// Save to a snapshot file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(self.store.book(), path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Identity ────────────────────────────────────────────────────

    /// Register a new user. Returns the new user id.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<UserId, CoreError> {
        let id = self.auth_service.register(&mut self.store, name, email, password)?;
        self.dirty = true;
        Ok(id)
    }

    /// Verify credentials and return the user's profile.
    pub fn login(&self, email: &str, password: &str) -> Result<UserProfile, CoreError> {
        self.auth_service.login(&self.store, email, password)
    }

    pub fn get_profile(&self, user_id: UserId) -> Result<UserProfile, CoreError> {
        self.auth_service.get_profile(&self.store, user_id)
    }

    pub fn update_profile(&mut self, user_id: UserId, update: ProfileUpdate) -> Result<(), CoreError> {
        self.auth_service.update_profile(&mut self.store, user_id, update)?;
        self.dirty = true;
        Ok(())
    }

    // ── Catalog ─────────────────────────────────────────────────────

    /// All stocks, ordered by symbol.
    pub fn list_stocks(&self) -> Result<Vec<Stock>, CoreError> {
        self.store.list_stocks()
    }

    /// All brokers, ordered by name.
    pub fn list_brokers(&self) -> Result<Vec<Broker>, CoreError> {
        self.store.list_brokers()
    }

    /// Add a stock to the catalog. Its price joins the static quote table.
    pub fn add_stock(
        &mut self,
        symbol: &str,
        name: &str,
        price: f64,
    ) -> Result<StockId, CoreError> {
        if symbol.trim().is_empty() {
            return Err(CoreError::ValidationError("Stock symbol must not be empty".into()));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Stock price must not be negative, got {price}"
            )));
        }
        let stock = Stock::new(symbol, name, price);
        let id = stock.stock_id;
        self.store.insert_stock(stock)?;
        self.rebuild_price_registry();
        self.dirty = true;
        Ok(id)
    }

    pub fn add_broker(&mut self, name: &str) -> Result<BrokerId, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::ValidationError("Broker name must not be empty".into()));
        }
        let broker = Broker::new(name.trim());
        let id = broker.broker_id;
        self.store.insert_broker(broker)?;
        self.dirty = true;
        Ok(id)
    }

    // ── Holdings ────────────────────────────────────────────────────

    pub fn add_holding(&mut self, user_id: UserId, holding: NewHolding) -> Result<HoldingId, CoreError> {
        let id = self.holding_service.add_holding(&mut self.store, user_id, holding)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn update_holding(
        &mut self,
        user_id: UserId,
        holding_id: HoldingId,
        update: HoldingUpdate,
    ) -> Result<(), CoreError> {
        self.holding_service
            .update_holding(&mut self.store, user_id, holding_id, update)?;
        self.dirty = true;
        Ok(())
    }

    pub fn delete_holding(&mut self, user_id: UserId, holding_id: HoldingId) -> Result<(), CoreError> {
        self.holding_service
            .delete_holding(&mut self.store, user_id, holding_id)?;
        self.dirty = true;
        Ok(())
    }

    /// The user's raw holdings, newest first.
    pub fn list_holdings(&self, user_id: UserId) -> Result<Vec<RawHolding>, CoreError> {
        self.holding_service.list_holdings(&self.store, user_id)
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Summary, enriched holdings, broker distribution, P&L by symbol and
    /// value trend for one user. Fetches current prices first; a price
    /// oracle outage fails the whole request.
    pub async fn dashboard(&mut self, user_id: UserId) -> Result<Dashboard, CoreError> {
        let holdings = self.store.list_holdings(user_id)?;
        let prices = self
            .price_service
            .quote_snapshot(holdings.iter().map(|h| h.stock_symbol.as_str()))
            .await?;
        Ok(self.valuation_service.compute_dashboard(holdings, &prices))
    }

    /// CSV export of the user's enriched holdings.
    pub async fn export_csv(&mut self, user_id: UserId) -> Result<String, CoreError> {
        let dashboard = self.dashboard(user_id).await?;
        self.export_service.export_csv(&dashboard.holdings)
    }

    /// Drop cached quotes so the next dashboard refetches prices.
    pub fn refresh_prices(&mut self) {
        self.price_service.invalidate();
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.store.book().settings
    }

    /// Set an API key for a provider (e.g., "alphavantage").
    /// Rebuilds the provider registry so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.store.book_mut().settings.api_keys.insert(provider, key);
        self.rebuild_price_registry();
        self.dirty = true;
    }

    /// Remove an API key for a provider.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self
            .store
            .book_mut()
            .settings
            .api_keys
            .remove(provider)
            .is_some();
        if removed {
            self.rebuild_price_registry();
            self.dirty = true;
        }
        removed
    }

    /// Turn live market data providers on or off.
    pub fn set_use_live_prices(&mut self, enabled: bool) {
        self.store.book_mut().settings.use_live_prices = enabled;
        self.rebuild_price_registry();
        self.dirty = true;
    }

    /// Set the price quoted for symbols missing from the catalog table.
    pub fn set_static_price_fallback(&mut self, price: Option<f64>) -> Result<(), CoreError> {
        if let Some(p) = price {
            if !p.is_finite() || p < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Fallback price must not be negative, got {p}"
                )));
            }
        }
        self.store.book_mut().settings.static_price_fallback = price;
        self.rebuild_price_registry();
        self.dirty = true;
        Ok(())
    }

    /// Names of the active price providers, in priority order.
    #[must_use]
    pub fn price_provider_names(&self) -> Vec<String> {
        self.price_service.provider_names()
    }

    /// Returns `true` if anything has changed since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(book: PortfolioBook) -> Self {
        let registry = PriceProviderRegistry::new_with_defaults(&book.settings, &book.stocks);
        Self {
            store: InMemoryStore::from_book(book),
            auth_service: AuthService::new(),
            holding_service: HoldingService::new(),
            price_service: PriceService::new(registry),
            valuation_service: ValuationService::new(),
            export_service: ExportService::new(),
            custom_registry: false,
            dirty: false,
        }
    }

    fn rebuild_price_registry(&mut self) {
        if self.custom_registry {
            return;
        }
        let book = self.store.book();
        let registry = PriceProviderRegistry::new_with_defaults(&book.settings, &book.stocks);
        self.price_service.replace_registry(registry);
    }
}
