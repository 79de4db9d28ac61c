use serde::{Deserialize, Serialize};

use super::catalog::{Broker, Stock};
use super::holding::HoldingRecord;
use super::settings::Settings;
use super::user::User;

/// Everything an in-memory store holds. This is what gets serialized
/// to a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioBook {
    pub users: Vec<User>,
    pub stocks: Vec<Stock>,
    pub brokers: Vec<Broker>,
    /// Holding rows in insertion order (oldest first).
    pub holdings: Vec<HoldingRecord>,
    #[serde(default)]
    pub settings: Settings,
}
