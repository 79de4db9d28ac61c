use crate::errors::CoreError;
use crate::models::catalog::{Broker, Stock};
use crate::models::holding::{
    BrokerId, HoldingId, HoldingRecord, HoldingUpdate, RawHolding, StockId, UserId,
};
use crate::models::user::User;

/// Storage abstraction for holdings (the "Holding Store").
///
/// Reads return holdings with broker and stock details joined in, in the
/// canonical [`RawHolding`] shape. The valuation engine only ever sees that
/// shape, so it does not care whether rows come from memory or a database.
///
/// Ownership is part of every operation: a holding belonging to another
/// user behaves exactly like one that does not exist.
pub trait HoldingStore: Send + Sync {
    /// All holdings of `user_id`, most recently created first.
    fn list_holdings(&self, user_id: UserId) -> Result<Vec<RawHolding>, CoreError>;

    fn get_holding(
        &self,
        user_id: UserId,
        holding_id: HoldingId,
    ) -> Result<Option<RawHolding>, CoreError>;

    fn insert_holding(&mut self, record: HoldingRecord) -> Result<(), CoreError>;

    /// Returns `false` if no holding with this id is owned by `user_id`.
    fn update_holding(
        &mut self,
        user_id: UserId,
        holding_id: HoldingId,
        update: HoldingUpdate,
    ) -> Result<bool, CoreError>;

    /// Returns `false` if no holding with this id is owned by `user_id`.
    fn delete_holding(&mut self, user_id: UserId, holding_id: HoldingId)
        -> Result<bool, CoreError>;
}

/// Reference data: stocks and brokers a holding can point at.
pub trait CatalogStore: Send + Sync {
    /// All stocks, ordered by symbol.
    fn list_stocks(&self) -> Result<Vec<Stock>, CoreError>;

    /// All brokers, ordered by name.
    fn list_brokers(&self) -> Result<Vec<Broker>, CoreError>;

    fn get_stock(&self, stock_id: StockId) -> Result<Option<Stock>, CoreError>;

    fn get_broker(&self, broker_id: BrokerId) -> Result<Option<Broker>, CoreError>;

    fn insert_stock(&mut self, stock: Stock) -> Result<(), CoreError>;

    fn insert_broker(&mut self, broker: Broker) -> Result<(), CoreError>;
}

/// Credential and profile storage.
pub trait UserStore: Send + Sync {
    /// Lookup by normalized (trimmed, lowercased) email.
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;

    fn get_user(&self, user_id: UserId) -> Result<Option<User>, CoreError>;

    fn insert_user(&mut self, user: User) -> Result<(), CoreError>;

    /// Replace a stored user. Returns `false` if the id is unknown.
    fn update_user(&mut self, user: User) -> Result<bool, CoreError>;
}
