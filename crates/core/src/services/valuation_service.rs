use log::debug;

use crate::models::analytics::{
    BrokerShare, Dashboard, DistributionEntry, EnrichedHolding, Performer, PortfolioInsights,
    PortfolioSummary, SymbolPnLEntry, ValueTrendPoint,
};
use crate::models::holding::RawHolding;
use crate::models::price::PriceLookup;

/// Label of the single point emitted for an empty portfolio.
pub const NO_DATA_LABEL: &str = "No Data";

/// Label given to the final value-trend point once it is pinned to the total.
pub const CURRENT_LABEL: &str = "Current";

/// Turns raw holdings and current prices into P&L metrics and
/// portfolio-level aggregates.
///
/// Pure business logic: no I/O, no shared state, never fails. Missing
/// prices, broker names and dates degrade to 0, "Unknown" and synthetic
/// labels respectively. Identical inputs produce identical output.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Compute per-holding metrics for one holding.
    ///
    /// `invested` is the buy price per share, so cost = quantity × invested.
    /// Non-finite inputs and results are coerced to 0 so NaN never reaches
    /// the totals.
    pub fn derive(&self, raw: RawHolding, prices: &impl PriceLookup) -> EnrichedHolding {
        let quantity = finite_or_zero(raw.quantity);
        let buy_price = finite_or_zero(raw.invested);
        let current = prices
            .price_of(&raw.stock_symbol)
            .map(finite_or_zero)
            .unwrap_or(0.0);

        // Finite inputs can still overflow; products are clamped the same way.
        let cost = finite_or_zero(quantity * buy_price);
        let value = finite_or_zero(quantity * current);
        let pnl = finite_or_zero(value - cost);
        let pnl_percent = if cost > 0.0 {
            finite_or_zero((pnl / cost) * 100.0)
        } else {
            0.0
        };

        EnrichedHolding {
            holding: raw,
            current,
            cost,
            value,
            pnl,
            pnl_percent,
        }
    }

    /// Sum value, cost and P&L over all holdings. Empty input gives zeros.
    pub fn aggregate(&self, enriched: &[EnrichedHolding]) -> PortfolioSummary {
        let mut summary = enriched.iter().fold(PortfolioSummary::default(), |mut acc, h| {
            acc.total_value += h.value;
            acc.total_cost += h.cost;
            acc.total_pnl += h.pnl;
            acc.holdings_count += 1;
            acc
        });
        summary.total_value = finite_or_zero(summary.total_value);
        summary.total_cost = finite_or_zero(summary.total_cost);
        summary.total_pnl = finite_or_zero(summary.total_pnl);
        summary
    }

    /// Market value per broker, one entry per broker name in first-seen order.
    pub fn build_distribution(&self, enriched: &[EnrichedHolding]) -> Vec<DistributionEntry> {
        let mut distribution: Vec<DistributionEntry> = Vec::new();
        for h in enriched {
            let label = h.broker_label();
            match distribution.iter_mut().find(|e| e.label == label) {
                Some(entry) => entry.value += h.value,
                None => distribution.push(DistributionEntry {
                    label: label.to_string(),
                    value: h.value,
                }),
            }
        }
        distribution
    }

    /// One (symbol, broker, pnl) row per holding, in input order.
    /// The same symbol held at two brokers stays two rows.
    pub fn build_symbol_pnl(&self, enriched: &[EnrichedHolding]) -> Vec<SymbolPnLEntry> {
        enriched
            .iter()
            .map(|h| SymbolPnLEntry {
                symbol: h.holding.stock_symbol.clone(),
                broker: h.broker_label().to_string(),
                pnl: h.pnl,
            })
            .collect()
    }

    /// Reconstruct an approximate value-over-time series.
    ///
    /// Holdings are ordered by creation time (missing dates count as the
    /// epoch, i.e. earliest) and their values accumulated. When every
    /// holding produced a point, the last one is pinned to `total_value`
    /// and labelled "Current".
    pub fn build_value_trend(
        &self,
        enriched: &[EnrichedHolding],
        total_value: f64,
    ) -> Vec<ValueTrendPoint> {
        if enriched.is_empty() {
            return vec![ValueTrendPoint {
                label: NO_DATA_LABEL.to_string(),
                value: 0.0,
            }];
        }

        let mut sorted: Vec<&EnrichedHolding> = enriched.iter().collect();
        sorted.sort_by_key(|h| {
            h.holding
                .date_created
                .map(|d| d.timestamp_millis())
                .unwrap_or(0)
        });

        let mut running = 0.0;
        let mut points: Vec<ValueTrendPoint> = sorted
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                running += h.value;
                // UTC calendar day of creation.
                let label = match h.holding.date_created {
                    Some(created) => created.format("%b %-d").to_string(),
                    None => format!("Stock {}", idx + 1),
                };
                ValueTrendPoint {
                    label,
                    value: running,
                }
            })
            .collect();

        // Pin only a complete build: one point per holding.
        if points.len() == enriched.len() {
            if let Some(last) = points.last_mut() {
                last.value = total_value;
                last.label = CURRENT_LABEL.to_string();
            }
        }

        points
    }

    /// Full dashboard for one user's holdings.
    ///
    /// Holdings keep the store's delivery order; the value trend is built
    /// from the summary's total.
    pub fn compute_dashboard(
        &self,
        raw_holdings: Vec<RawHolding>,
        prices: &impl PriceLookup,
    ) -> Dashboard {
        let holdings: Vec<EnrichedHolding> = raw_holdings
            .into_iter()
            .map(|raw| self.derive(raw, prices))
            .collect();

        let summary = self.aggregate(&holdings);
        let distribution = self.build_distribution(&holdings);
        let pnl_by_symbol = self.build_symbol_pnl(&holdings);
        let value_trend = self.build_value_trend(&holdings, summary.total_value);
        let insights = self.build_insights(&holdings, &summary, &distribution);

        debug!(
            "computed dashboard: {} holdings, total value {:.2}, total P&L {:.2}",
            summary.holdings_count, summary.total_value, summary.total_pnl
        );

        Dashboard {
            summary,
            holdings,
            distribution,
            pnl_by_symbol,
            value_trend,
            insights,
        }
    }

    /// Best/worst performer, overall P&L %, broker shares and a
    /// diversification score.
    ///
    /// Best is the first holding with the highest P&L, worst the last one
    /// with the lowest, matching a stable descending sort by P&L.
    pub fn build_insights(
        &self,
        enriched: &[EnrichedHolding],
        summary: &PortfolioSummary,
        distribution: &[DistributionEntry],
    ) -> PortfolioInsights {
        let mut best: Option<&EnrichedHolding> = None;
        let mut worst: Option<&EnrichedHolding> = None;
        for h in enriched {
            if best.map_or(true, |b| h.pnl > b.pnl) {
                best = Some(h);
            }
            if worst.map_or(true, |w| h.pnl <= w.pnl) {
                worst = Some(h);
            }
        }

        let total_pnl_percent = if summary.total_cost > 0.0 {
            finite_or_zero((summary.total_pnl / summary.total_cost) * 100.0)
        } else {
            0.0
        };

        let distribution_total: f64 = distribution.iter().map(|e| e.value).sum();
        let broker_shares = distribution
            .iter()
            .map(|e| BrokerShare {
                label: e.label.clone(),
                value: e.value,
                percent: if distribution_total > 0.0 {
                    finite_or_zero((e.value / distribution_total) * 100.0)
                } else {
                    0.0
                },
            })
            .collect();

        let diversification_score = enriched.len().saturating_mul(10).min(100) as u32;

        PortfolioInsights {
            best_performer: best.map(performer),
            worst_performer: worst.map(performer),
            total_pnl_percent,
            broker_shares,
            diversification_score,
        }
    }
}

fn performer(h: &EnrichedHolding) -> Performer {
    Performer {
        holding_id: h.holding.id,
        symbol: h.holding.stock_symbol.clone(),
        broker: h.broker_label().to_string(),
        pnl: h.pnl,
        pnl_percent: h.pnl_percent,
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}
