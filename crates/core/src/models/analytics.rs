use serde::{Deserialize, Serialize};

use super::holding::{HoldingId, RawHolding};

/// A holding with its derived financial metrics at evaluation time.
///
/// Computed fresh on every analytics request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedHolding {
    /// The source row, flattened into the same JSON object.
    #[serde(flatten)]
    pub holding: RawHolding,

    /// Current price per share (0 when no quote was available)
    pub current: f64,

    /// Cost basis: quantity × buy price per share
    pub cost: f64,

    /// Market value: quantity × current price
    pub value: f64,

    /// Unrealized profit/loss: value − cost
    pub pnl: f64,

    /// pnl / cost × 100, or exactly 0 when cost is 0
    pub pnl_percent: f64,
}

impl EnrichedHolding {
    /// Broker label used by charts: the display name or "Unknown".
    pub fn broker_label(&self) -> &str {
        self.holding.broker_name.as_deref().unwrap_or(UNKNOWN_BROKER)
    }
}

/// Label for holdings whose broker has no display name.
pub const UNKNOWN_BROKER: &str = "Unknown";

/// Portfolio-level totals over one user's holdings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    #[serde(rename = "totalValue")]
    pub total_value: f64,

    #[serde(rename = "totalCost")]
    pub total_cost: f64,

    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,

    #[serde(rename = "holdingsCount")]
    pub holdings_count: usize,
}

/// Market value held at one broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub label: String,
    pub value: f64,
}

/// P&L of a single holding, for bar-chart display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPnLEntry {
    pub symbol: String,
    pub broker: String,
    pub pnl: f64,
}

/// One point of the reconstructed value trend.
///
/// The trend is cumulative market value ordered by holding creation date.
/// It is an approximation built from *current* prices, not a
/// mark-to-market history: no historical price series is stored.
/// Date labels are rendered from the UTC creation timestamp, so a holding
/// added near midnight may carry a different day than the viewer's clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTrendPoint {
    pub label: String,
    pub value: f64,
}

/// Everything the dashboard and analytics views render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: PortfolioSummary,
    pub holdings: Vec<EnrichedHolding>,
    pub distribution: Vec<DistributionEntry>,
    pub pnl_by_symbol: Vec<SymbolPnLEntry>,
    pub value_trend: Vec<ValueTrendPoint>,
    pub insights: PortfolioInsights,
}

/// A holding singled out by its P&L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performer {
    pub holding_id: HoldingId,
    pub symbol: String,
    pub broker: String,
    pub pnl: f64,
    pub pnl_percent: f64,
}

/// A broker's slice of the distribution, with its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerShare {
    pub label: String,
    pub value: f64,
    /// value / total distribution value × 100, or 0 when the total is 0
    pub percent: f64,
}

/// Headline figures derived from the rest of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInsights {
    /// Highest P&L; the first one wins a tie. `None` when empty.
    pub best_performer: Option<Performer>,
    /// Lowest P&L; the last one wins a tie. A single holding is both best
    /// and worst.
    pub worst_performer: Option<Performer>,
    /// total P&L / total cost × 100, or 0 when cost is 0
    #[serde(rename = "totalPnLPercent")]
    pub total_pnl_percent: f64,
    pub broker_shares: Vec<BrokerShare>,
    /// 10 points per holding, capped at 100.
    pub diversification_score: u32,
}
