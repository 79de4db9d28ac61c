use crate::errors::CoreError;
use crate::models::holding::{
    BrokerId, HoldingId, HoldingRecord, HoldingUpdate, NewHolding, RawHolding, StockId, UserId,
};
use crate::store::traits::{CatalogStore, HoldingStore};

/// Write path for holdings: validates before anything reaches the store.
///
/// This is where the `quantity > 0, invested >= 0` invariant the valuation
/// engine relies on is enforced.
pub struct HoldingService;

impl HoldingService {
    pub fn new() -> Self {
        Self
    }

    /// Create a holding for `user_id`. Returns the new holding's id.
    pub fn add_holding<S>(
        &self,
        store: &mut S,
        user_id: UserId,
        holding: NewHolding,
    ) -> Result<HoldingId, CoreError>
    where
        S: HoldingStore + CatalogStore,
    {
        self.validate(store, holding.broker_id, holding.stock_id, holding.quantity, holding.invested)?;
        let record = HoldingRecord::new(user_id, holding);
        let id = record.id;
        store.insert_holding(record)?;
        Ok(id)
    }

    /// Replace the editable fields of a holding owned by `user_id`.
    pub fn update_holding<S>(
        &self,
        store: &mut S,
        user_id: UserId,
        holding_id: HoldingId,
        update: HoldingUpdate,
    ) -> Result<(), CoreError>
    where
        S: HoldingStore + CatalogStore,
    {
        self.validate(store, update.broker_id, update.stock_id, update.quantity, update.invested)?;
        if store.update_holding(user_id, holding_id, update)? {
            Ok(())
        } else {
            Err(CoreError::HoldingNotFound(holding_id.to_string()))
        }
    }

    /// Delete a holding owned by `user_id`.
    pub fn delete_holding<S>(
        &self,
        store: &mut S,
        user_id: UserId,
        holding_id: HoldingId,
    ) -> Result<(), CoreError>
    where
        S: HoldingStore,
    {
        if store.delete_holding(user_id, holding_id)? {
            Ok(())
        } else {
            Err(CoreError::HoldingNotFound(holding_id.to_string()))
        }
    }

    /// All holdings of `user_id`, newest first.
    pub fn list_holdings<S>(&self, store: &S, user_id: UserId) -> Result<Vec<RawHolding>, CoreError>
    where
        S: HoldingStore,
    {
        store.list_holdings(user_id)
    }

    /// Rules:
    /// - Quantity must be a finite number greater than zero
    /// - Buy price per share must be finite and not negative
    /// - Their product (the cost basis) must be finite
    /// - Stock and broker must exist in the catalog
    fn validate<S>(
        &self,
        store: &S,
        broker_id: BrokerId,
        stock_id: StockId,
        quantity: f64,
        invested: f64,
    ) -> Result<(), CoreError>
    where
        S: CatalogStore,
    {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Quantity must be a positive number, got {quantity}"
            )));
        }
        if !invested.is_finite() || invested < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Buy price per share must not be negative, got {invested}"
            )));
        }
        if !(quantity * invested).is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Cost basis out of range: {quantity} x {invested}"
            )));
        }
        if store.get_stock(stock_id)?.is_none() {
            return Err(CoreError::StockNotFound(stock_id.to_string()));
        }
        if store.get_broker(broker_id)?.is_none() {
            return Err(CoreError::BrokerNotFound(broker_id.to_string()));
        }
        Ok(())
    }
}

impl Default for HoldingService {
    fn default() -> Self {
        Self::new()
    }
}
