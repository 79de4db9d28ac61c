use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type HoldingId = Uuid;
pub type UserId = Uuid;
pub type BrokerId = Uuid;
pub type StockId = Uuid;

/// A holding as stored: one user's position in one stock via one broker.
///
/// This is the persisted shape. Display data (broker name, stock symbol)
/// is joined in by the store when it produces a [`RawHolding`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub id: HoldingId,
    pub user_id: UserId,
    pub broker_id: BrokerId,
    pub stock_id: StockId,
    pub quantity: f64,
    /// Buy price **per share**. See [`RawHolding::invested`].
    pub invested: f64,
    pub date_created: DateTime<Utc>,
    pub date_edited: DateTime<Utc>,
}

/// A holding as delivered by a [`HoldingStore`](crate::store::traits::HoldingStore)
/// to the valuation engine, with broker and stock details joined in.
///
/// Invariant (enforced on the write path, assumed here): `quantity > 0`
/// and `invested >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHolding {
    pub id: HoldingId,
    pub user_id: UserId,

    pub broker_id: BrokerId,
    /// Broker display name. `None` when the broker row is gone or unnamed;
    /// analytics group such holdings under "Unknown".
    pub broker_name: Option<String>,

    pub stock_id: StockId,
    pub stock_symbol: String,
    pub stock_name: String,

    /// Number of shares held.
    pub quantity: f64,

    /// Buy price **per share**, not the total amount invested.
    ///
    /// The name is historical. Cost basis is `quantity * invested`;
    /// treating this as a total would double-count by the quantity.
    pub invested: f64,

    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_edited: Option<DateTime<Utc>>,
}

/// Input for creating a holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHolding {
    pub broker_id: BrokerId,
    pub stock_id: StockId,
    pub quantity: f64,
    /// Buy price per share.
    pub invested: f64,
}

/// Full replacement of a holding's editable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingUpdate {
    pub broker_id: BrokerId,
    pub stock_id: StockId,
    pub quantity: f64,
    /// Buy price per share.
    pub invested: f64,
}

impl HoldingRecord {
    pub fn new(user_id: UserId, holding: NewHolding) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            broker_id: holding.broker_id,
            stock_id: holding.stock_id,
            quantity: holding.quantity,
            invested: holding.invested,
            date_created: now,
            date_edited: now,
        }
    }

    /// Apply an update in place and bump `date_edited`.
    pub fn apply(&mut self, update: HoldingUpdate) {
        self.broker_id = update.broker_id;
        self.stock_id = update.stock_id;
        self.quantity = update.quantity;
        self.invested = update.invested;
        self.date_edited = Utc::now();
    }
}
