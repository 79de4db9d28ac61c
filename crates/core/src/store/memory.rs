use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::book::PortfolioBook;
use crate::models::catalog::{Broker, Stock};
use crate::models::holding::{
    BrokerId, HoldingId, HoldingRecord, HoldingUpdate, RawHolding, StockId, UserId,
};
use crate::models::user::User;

use super::traits::{CatalogStore, HoldingStore, UserStore};

/// Store backed by an owned [`PortfolioBook`].
///
/// Holdings whose stock is missing from the catalog are skipped on read
/// (like an inner join). A missing broker only clears `broker_name`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    book: PortfolioBook,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_book(book: PortfolioBook) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &PortfolioBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut PortfolioBook {
        &mut self.book
    }

    pub fn into_book(self) -> PortfolioBook {
        self.book
    }

    fn join(&self, record: &HoldingRecord) -> Option<RawHolding> {
        let Some(stock) = self
            .book
            .stocks
            .iter()
            .find(|s| s.stock_id == record.stock_id)
        else {
            warn!(
                "holding {} references unknown stock {}, skipping",
                record.id, record.stock_id
            );
            return None;
        };
        let broker_name = self
            .book
            .brokers
            .iter()
            .find(|b| b.broker_id == record.broker_id)
            .map(|b| b.broker_name.clone())
            .filter(|n| !n.trim().is_empty());

        Some(RawHolding {
            id: record.id,
            user_id: record.user_id,
            broker_id: record.broker_id,
            broker_name,
            stock_id: record.stock_id,
            stock_symbol: stock.stock_symbol.clone(),
            stock_name: stock.stock_name.clone(),
            quantity: record.quantity,
            invested: record.invested,
            date_created: Some(record.date_created),
            date_edited: Some(record.date_edited),
        })
    }

    fn owned_position(&self, user_id: UserId, holding_id: HoldingId) -> Option<usize> {
        self.book
            .holdings
            .iter()
            .position(|h| h.id == holding_id && h.user_id == user_id)
    }
}

impl HoldingStore for InMemoryStore {
    fn list_holdings(&self, user_id: UserId) -> Result<Vec<RawHolding>, CoreError> {
        // Newest inserted first, then a stable sort so snapshots loaded
        // out of order still come back newest-created first.
        let mut holdings: Vec<RawHolding> = self
            .book
            .holdings
            .iter()
            .rev()
            .filter(|h| h.user_id == user_id)
            .filter_map(|h| self.join(h))
            .collect();
        holdings.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(holdings)
    }

    fn get_holding(
        &self,
        user_id: UserId,
        holding_id: HoldingId,
    ) -> Result<Option<RawHolding>, CoreError> {
        Ok(self
            .owned_position(user_id, holding_id)
            .and_then(|idx| self.join(&self.book.holdings[idx])))
    }

    fn insert_holding(&mut self, record: HoldingRecord) -> Result<(), CoreError> {
        debug!("insert holding {} for user {}", record.id, record.user_id);
        self.book.holdings.push(record);
        Ok(())
    }

    fn update_holding(
        &mut self,
        user_id: UserId,
        holding_id: HoldingId,
        update: HoldingUpdate,
    ) -> Result<bool, CoreError> {
        match self.owned_position(user_id, holding_id) {
            Some(idx) => {
                debug!("update holding {holding_id}");
                self.book.holdings[idx].apply(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_holding(
        &mut self,
        user_id: UserId,
        holding_id: HoldingId,
    ) -> Result<bool, CoreError> {
        match self.owned_position(user_id, holding_id) {
            Some(idx) => {
                debug!("delete holding {holding_id}");
                self.book.holdings.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl CatalogStore for InMemoryStore {
    fn list_stocks(&self) -> Result<Vec<Stock>, CoreError> {
        let mut stocks = self.book.stocks.clone();
        stocks.sort_by(|a, b| a.stock_symbol.cmp(&b.stock_symbol));
        Ok(stocks)
    }

    fn list_brokers(&self) -> Result<Vec<Broker>, CoreError> {
        let mut brokers = self.book.brokers.clone();
        brokers.sort_by(|a, b| a.broker_name.cmp(&b.broker_name));
        Ok(brokers)
    }

    fn get_stock(&self, stock_id: StockId) -> Result<Option<Stock>, CoreError> {
        Ok(self
            .book
            .stocks
            .iter()
            .find(|s| s.stock_id == stock_id)
            .cloned())
    }

    fn get_broker(&self, broker_id: BrokerId) -> Result<Option<Broker>, CoreError> {
        Ok(self
            .book
            .brokers
            .iter()
            .find(|b| b.broker_id == broker_id)
            .cloned())
    }

    fn insert_stock(&mut self, stock: Stock) -> Result<(), CoreError> {
        if self
            .book
            .stocks
            .iter()
            .any(|s| s.stock_symbol == stock.stock_symbol)
        {
            return Err(CoreError::ValidationError(format!(
                "Stock {} already exists",
                stock.stock_symbol
            )));
        }
        self.book.stocks.push(stock);
        Ok(())
    }

    fn insert_broker(&mut self, broker: Broker) -> Result<(), CoreError> {
        if self
            .book
            .brokers
            .iter()
            .any(|b| b.broker_name.eq_ignore_ascii_case(&broker.broker_name))
        {
            return Err(CoreError::ValidationError(format!(
                "Broker {} already exists",
                broker.broker_name
            )));
        }
        self.book.brokers.push(broker);
        Ok(())
    }
}

impl UserStore for InMemoryStore {
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        Ok(self
            .book
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    fn get_user(&self, user_id: UserId) -> Result<Option<User>, CoreError> {
        Ok(self
            .book
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned())
    }

    fn insert_user(&mut self, user: User) -> Result<(), CoreError> {
        if self.book.users.iter().any(|u| u.email == user.email) {
            return Err(CoreError::EmailExists(user.email));
        }
        self.book.users.push(user);
        Ok(())
    }

    fn update_user(&mut self, user: User) -> Result<bool, CoreError> {
        match self
            .book
            .users
            .iter_mut()
            .find(|u| u.user_id == user.user_id)
        {
            Some(slot) => {
                *slot = user;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
