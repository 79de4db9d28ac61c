// ═══════════════════════════════════════════════════════════════════
// Valuation Tests: metric derivation, aggregation, distribution,
// P&L by symbol, value trend, full dashboard
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use stock_portfolio_core::models::analytics::{EnrichedHolding, PortfolioInsights};
use stock_portfolio_core::models::holding::RawHolding;
use stock_portfolio_core::models::price::QuoteSnapshot;
use stock_portfolio_core::services::valuation_service::{
    ValuationService, CURRENT_LABEL, NO_DATA_LABEL,
};

const EPS: f64 = 1e-9;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn holding(symbol: &str, broker: Option<&str>, quantity: f64, invested: f64) -> RawHolding {
    RawHolding {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        broker_id: Uuid::new_v4(),
        broker_name: broker.map(String::from),
        stock_id: Uuid::new_v4(),
        stock_symbol: symbol.to_string(),
        stock_name: format!("{symbol} Inc."),
        quantity,
        invested,
        date_created: None,
        date_edited: None,
    }
}

fn created(mut h: RawHolding, when: DateTime<Utc>) -> RawHolding {
    h.date_created = Some(when);
    h.date_edited = Some(when);
    h
}

fn prices(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(s, p)| (s.to_string(), *p)).collect()
}

fn enrich(raws: Vec<RawHolding>, table: &HashMap<String, f64>) -> Vec<EnrichedHolding> {
    let svc = ValuationService::new();
    raws.into_iter().map(|r| svc.derive(r, table)).collect()
}

/// The two-holding portfolio used throughout: AAPL up, MSFT down.
fn sample_portfolio() -> (Vec<RawHolding>, HashMap<String, f64>) {
    let raws = vec![
        created(holding("AAPL", Some("X"), 10.0, 100.0), at(2024, 1, 1)),
        created(holding("MSFT", Some("Y"), 5.0, 200.0), at(2024, 1, 2)),
    ];
    (raws, prices(&[("AAPL", 150.0), ("MSFT", 180.0)]))
}

// ═══════════════════════════════════════════════════════════════════
// Metric Deriver
// ═══════════════════════════════════════════════════════════════════

mod derive {
    use super::*;

    #[test]
    fn gain() {
        let svc = ValuationService::new();
        let e = svc.derive(holding("AAPL", Some("X"), 10.0, 100.0), &prices(&[("AAPL", 150.0)]));
        assert_eq!(e.current, 150.0);
        assert_eq!(e.cost, 1000.0);
        assert_eq!(e.value, 1500.0);
        assert_eq!(e.pnl, 500.0);
        assert!((e.pnl_percent - 50.0).abs() < EPS);
    }

    #[test]
    fn loss() {
        let svc = ValuationService::new();
        let e = svc.derive(holding("MSFT", Some("Y"), 5.0, 200.0), &prices(&[("MSFT", 180.0)]));
        assert_eq!(e.cost, 1000.0);
        assert_eq!(e.value, 900.0);
        assert_eq!(e.pnl, -100.0);
        assert!((e.pnl_percent - (-10.0)).abs() < EPS);
    }

    #[test]
    fn invested_is_price_per_share_not_total() {
        // 4 shares bought at 25 each: cost basis is 100.
        // Reading invested as a total would give 25; multiplying a total
        // by quantity again would give 2500.
        let svc = ValuationService::new();
        let e = svc.derive(holding("IBM", None, 4.0, 25.0), &prices(&[("IBM", 30.0)]));
        assert_eq!(e.cost, 100.0);
        assert_ne!(e.cost, 25.0);
        assert_ne!(e.cost, 2500.0);
        assert_eq!(e.pnl, 20.0);
    }

    #[test]
    fn zero_cost_gives_zero_percent() {
        let svc = ValuationService::new();
        let e = svc.derive(holding("FREE", None, 1.0, 0.0), &prices(&[("FREE", 50.0)]));
        assert_eq!(e.cost, 0.0);
        assert_eq!(e.value, 50.0);
        assert_eq!(e.pnl, 50.0);
        assert_eq!(e.pnl_percent, 0.0);
        assert!(e.pnl_percent.is_finite());
    }

    #[test]
    fn missing_price_is_zero() {
        let svc = ValuationService::new();
        let e = svc.derive(holding("ZZZZ", None, 3.0, 10.0), &prices(&[]));
        assert_eq!(e.current, 0.0);
        assert_eq!(e.value, 0.0);
        assert_eq!(e.pnl, -30.0);
        assert!((e.pnl_percent - (-100.0)).abs() < EPS);
    }

    #[test]
    fn non_finite_inputs_coerced_to_zero() {
        let svc = ValuationService::new();
        let e = svc.derive(
            holding("NAN", None, f64::NAN, f64::INFINITY),
            &prices(&[("NAN", f64::NAN)]),
        );
        assert_eq!(e.current, 0.0);
        assert_eq!(e.cost, 0.0);
        assert_eq!(e.value, 0.0);
        assert_eq!(e.pnl, 0.0);
        assert_eq!(e.pnl_percent, 0.0);
    }

    #[test]
    fn overflowing_products_coerced_to_zero() {
        let svc = ValuationService::new();
        let e = svc.derive(holding("BIG", None, 1e200, 1e200), &prices(&[("BIG", 1e200)]));
        for (name, x) in [
            ("cost", e.cost),
            ("value", e.value),
            ("pnl", e.pnl),
            ("pnl_percent", e.pnl_percent),
        ] {
            assert!(x.is_finite(), "{name} = {x}");
        }
        assert_eq!(e.cost, 0.0);
        assert_eq!(e.value, 0.0);
        assert_eq!(e.pnl, 0.0);
        assert_eq!(e.pnl_percent, 0.0);

        let s = svc.aggregate(&[e]);
        assert!(s.total_value.is_finite() && s.total_pnl.is_finite());
    }

    #[test]
    fn keeps_source_row() {
        let svc = ValuationService::new();
        let raw = created(holding("AAPL", Some("X"), 2.0, 1.0), at(2024, 3, 1));
        let e = svc.derive(raw.clone(), &prices(&[("AAPL", 1.0)]));
        assert_eq!(e.holding, raw);
    }

    #[test]
    fn value_minus_cost_equals_pnl() {
        let svc = ValuationService::new();
        let table = prices(&[("A", 0.1), ("B", 123.456), ("C", 0.0)]);
        for (sym, q, inv) in [("A", 3.0, 0.3), ("B", 7.25, 99.99), ("C", 1.0, 5.0), ("D", 2.0, 1.5)] {
            let e = svc.derive(holding(sym, None, q, inv), &table);
            assert!((e.value - e.cost - e.pnl).abs() < EPS, "{sym}");
        }
    }

    #[test]
    fn accepts_closure_lookup() {
        let svc = ValuationService::new();
        let lookup = |s: &str| if s == "AAPL" { Some(2.0) } else { None };
        let e = svc.derive(holding("AAPL", None, 3.0, 1.0), &lookup);
        assert_eq!(e.value, 6.0);
    }

    #[test]
    fn accepts_quote_snapshot_case_insensitively() {
        let svc = ValuationService::new();
        let mut snap = QuoteSnapshot::new();
        snap.insert("aapl", 10.0);
        let e = svc.derive(holding("AAPL", None, 1.0, 1.0), &snap);
        assert_eq!(e.current, 10.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Portfolio Aggregator
// ═══════════════════════════════════════════════════════════════════

mod aggregate {
    use super::*;

    #[test]
    fn empty_is_all_zero() {
        let s = ValuationService::new().aggregate(&[]);
        assert_eq!(s.total_value, 0.0);
        assert_eq!(s.total_cost, 0.0);
        assert_eq!(s.total_pnl, 0.0);
        assert_eq!(s.holdings_count, 0);
    }

    #[test]
    fn sample_totals() {
        let (raws, table) = sample_portfolio();
        let enriched = enrich(raws, &table);
        let s = ValuationService::new().aggregate(&enriched);
        assert_eq!(s.total_value, 2400.0);
        assert_eq!(s.total_cost, 2000.0);
        assert_eq!(s.total_pnl, 400.0);
        assert_eq!(s.holdings_count, 2);
    }

    #[test]
    fn sums_match_holdings() {
        let table = prices(&[("A", 1.1), ("B", 2.2), ("C", 3.3)]);
        let enriched = enrich(
            vec![
                holding("A", Some("X"), 1.5, 1.0),
                holding("B", Some("X"), 2.5, 3.0),
                holding("C", None, 0.5, 7.0),
                holding("A", Some("Y"), 4.0, 0.9),
            ],
            &table,
        );
        let s = ValuationService::new().aggregate(&enriched);
        let value: f64 = enriched.iter().map(|h| h.value).sum();
        let cost: f64 = enriched.iter().map(|h| h.cost).sum();
        let pnl: f64 = enriched.iter().map(|h| h.pnl).sum();
        assert!((s.total_value - value).abs() < EPS);
        assert!((s.total_cost - cost).abs() < EPS);
        assert!((s.total_pnl - pnl).abs() < EPS);
        assert_eq!(s.holdings_count, 4);
    }

    #[test]
    fn order_independent() {
        let (raws, table) = sample_portfolio();
        let mut enriched = enrich(raws, &table);
        let svc = ValuationService::new();
        let forward = svc.aggregate(&enriched);
        enriched.reverse();
        let backward = svc.aggregate(&enriched);
        assert!((forward.total_value - backward.total_value).abs() < EPS);
        assert!((forward.total_cost - backward.total_cost).abs() < EPS);
        assert!((forward.total_pnl - backward.total_pnl).abs() < EPS);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Distribution Builder
// ═══════════════════════════════════════════════════════════════════

mod distribution {
    use super::*;

    #[test]
    fn sample_distribution() {
        let (raws, table) = sample_portfolio();
        let dist = ValuationService::new().build_distribution(&enrich(raws, &table));
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].label, "X");
        assert_eq!(dist[0].value, 1500.0);
        assert_eq!(dist[1].label, "Y");
        assert_eq!(dist[1].value, 900.0);
    }

    #[test]
    fn empty_is_empty() {
        assert!(ValuationService::new().build_distribution(&[]).is_empty());
    }

    #[test]
    fn groups_same_broker_and_sums_value() {
        let table = prices(&[("A", 10.0), ("B", 20.0), ("C", 5.0)]);
        let enriched = enrich(
            vec![
                holding("A", Some("IBKR"), 1.0, 100.0),
                holding("B", Some("Moomoo"), 1.0, 1.0),
                holding("C", Some("IBKR"), 2.0, 0.0),
            ],
            &table,
        );
        let dist = ValuationService::new().build_distribution(&enriched);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].label, "IBKR");
        // value, not cost or pnl
        assert_eq!(dist[0].value, 20.0);
        assert_eq!(dist[1].label, "Moomoo");
        assert_eq!(dist[1].value, 20.0);
    }

    #[test]
    fn missing_broker_is_unknown() {
        let table = prices(&[("A", 1.0), ("B", 2.0)]);
        let enriched = enrich(
            vec![holding("A", None, 1.0, 0.0), holding("B", None, 1.0, 0.0)],
            &table,
        );
        let dist = ValuationService::new().build_distribution(&enriched);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].label, "Unknown");
        assert_eq!(dist[0].value, 3.0);
    }

    #[test]
    fn first_seen_order() {
        let table = prices(&[("A", 1.0)]);
        let enriched = enrich(
            vec![
                holding("A", Some("Zeta"), 1.0, 0.0),
                holding("A", Some("Alpha"), 1.0, 0.0),
                holding("A", Some("Zeta"), 1.0, 0.0),
                holding("A", Some("Mid"), 1.0, 0.0),
            ],
            &table,
        );
        let labels: Vec<String> = ValuationService::new()
            .build_distribution(&enriched)
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn partitions_total_value() {
        let table = prices(&[("A", 3.3), ("B", 7.7)]);
        let enriched = enrich(
            vec![
                holding("A", Some("X"), 1.5, 1.0),
                holding("B", None, 2.0, 1.0),
                holding("B", Some("X"), 0.25, 1.0),
                holding("A", Some("Y"), 9.0, 1.0),
            ],
            &table,
        );
        let svc = ValuationService::new();
        let total = svc.aggregate(&enriched).total_value;
        let dist_sum: f64 = svc.build_distribution(&enriched).iter().map(|e| e.value).sum();
        assert!((dist_sum - total).abs() < EPS);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Symbol P&L Builder
// ═══════════════════════════════════════════════════════════════════

mod symbol_pnl {
    use super::*;

    #[test]
    fn one_row_per_holding_in_input_order() {
        let (raws, table) = sample_portfolio();
        let rows = ValuationService::new().build_symbol_pnl(&enrich(raws, &table));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "AAPL");
        assert_eq!(rows[0].broker, "X");
        assert_eq!(rows[0].pnl, 500.0);
        assert_eq!(rows[1].symbol, "MSFT");
        assert_eq!(rows[1].broker, "Y");
        assert_eq!(rows[1].pnl, -100.0);
    }

    #[test]
    fn same_symbol_at_two_brokers_stays_two_rows() {
        let table = prices(&[("AAPL", 2.0)]);
        let enriched = enrich(
            vec![
                holding("AAPL", Some("X"), 1.0, 1.0),
                holding("AAPL", Some("Y"), 1.0, 3.0),
            ],
            &table,
        );
        let rows = ValuationService::new().build_symbol_pnl(&enriched);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].broker, "X");
        assert_eq!(rows[0].pnl, 1.0);
        assert_eq!(rows[1].broker, "Y");
        assert_eq!(rows[1].pnl, -1.0);
    }

    #[test]
    fn preserves_delivery_order_not_date_order() {
        let table = prices(&[]);
        let enriched = enrich(
            vec![
                created(holding("NEW", None, 1.0, 1.0), at(2024, 6, 1)),
                created(holding("OLD", None, 1.0, 1.0), at(2020, 1, 1)),
            ],
            &table,
        );
        let rows = ValuationService::new().build_symbol_pnl(&enriched);
        assert_eq!(rows[0].symbol, "NEW");
        assert_eq!(rows[1].symbol, "OLD");
        assert_eq!(rows[1].broker, "Unknown");
    }

    #[test]
    fn empty_is_empty() {
        assert!(ValuationService::new().build_symbol_pnl(&[]).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Value-Trend Reconstructor
// ═══════════════════════════════════════════════════════════════════

mod value_trend {
    use super::*;

    #[test]
    fn empty_gives_single_no_data_point() {
        let trend = ValuationService::new().build_value_trend(&[], 0.0);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].label, NO_DATA_LABEL);
        assert_eq!(trend[0].label, "No Data");
        assert_eq!(trend[0].value, 0.0);
    }

    #[test]
    fn sample_trend() {
        let (raws, table) = sample_portfolio();
        let enriched = enrich(raws, &table);
        let trend = ValuationService::new().build_value_trend(&enriched, 2400.0);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].label, "Jan 1");
        assert_eq!(trend[0].value, 1500.0);
        assert_eq!(trend[1].label, CURRENT_LABEL);
        assert_eq!(trend[1].value, 2400.0);
    }

    #[test]
    fn sorted_by_creation_date_and_cumulative() {
        let table = prices(&[("A", 1.0), ("B", 2.0), ("C", 4.0)]);
        // Delivered newest first, as the store does.
        let enriched = enrich(
            vec![
                created(holding("C", None, 1.0, 0.0), at(2024, 3, 15)),
                created(holding("B", None, 1.0, 0.0), at(2024, 2, 5)),
                created(holding("A", None, 1.0, 0.0), at(2024, 1, 5)),
            ],
            &table,
        );
        let trend = ValuationService::new().build_value_trend(&enriched, 7.0);
        let labels: Vec<&str> = trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 5", "Feb 5", "Current"]);
        assert_eq!(trend[0].value, 1.0);
        assert_eq!(trend[1].value, 3.0);
        assert_eq!(trend[2].value, 7.0);
    }

    #[test]
    fn last_point_pinned_to_given_total() {
        let table = prices(&[("A", 1.0), ("B", 1.0)]);
        let enriched = enrich(
            vec![
                created(holding("A", None, 1.0, 0.0), at(2024, 1, 1)),
                created(holding("B", None, 1.0, 0.0), at(2024, 1, 2)),
            ],
            &table,
        );
        // Authoritative total wins over the running sum.
        let trend = ValuationService::new().build_value_trend(&enriched, 99.5);
        assert_eq!(trend.last().unwrap().value, 99.5);
        assert_eq!(trend.last().unwrap().label, "Current");
    }

    #[test]
    fn single_holding_is_current() {
        let table = prices(&[("A", 3.0)]);
        let enriched = enrich(vec![created(holding("A", None, 2.0, 1.0), at(2024, 7, 4))], &table);
        let trend = ValuationService::new().build_value_trend(&enriched, 6.0);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].label, "Current");
        assert_eq!(trend[0].value, 6.0);
    }

    #[test]
    fn labels_use_utc_calendar_day() {
        let table = prices(&[("A", 1.0), ("B", 1.0)]);
        let late = Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 0).unwrap();
        let enriched = enrich(
            vec![
                created(holding("A", None, 1.0, 0.0), late),
                created(holding("B", None, 1.0, 0.0), at(2024, 2, 1)),
            ],
            &table,
        );
        let trend = ValuationService::new().build_value_trend(&enriched, 2.0);
        assert_eq!(trend[0].label, "Jan 5");
    }

    #[test]
    fn missing_dates_sort_first_with_synthetic_labels() {
        let table = prices(&[("A", 1.0), ("B", 10.0), ("C", 100.0)]);
        let enriched = enrich(
            vec![
                created(holding("A", None, 1.0, 0.0), at(2024, 5, 9)),
                holding("B", None, 1.0, 0.0),
                holding("C", None, 1.0, 0.0),
            ],
            &table,
        );
        let trend = ValuationService::new().build_value_trend(&enriched, 111.0);
        assert_eq!(trend.len(), 3);
        // Undated holdings count as epoch zero, keeping their relative order.
        assert_eq!(trend[0].label, "Stock 1");
        assert_eq!(trend[0].value, 10.0);
        assert_eq!(trend[1].label, "Stock 2");
        assert_eq!(trend[1].value, 110.0);
        assert_eq!(trend[2].label, "Current");
        assert_eq!(trend[2].value, 111.0);
    }

    #[test]
    fn synthetic_label_uses_sorted_position() {
        let table = prices(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]);
        let enriched = enrich(
            vec![
                created(holding("A", None, 1.0, 0.0), at(2024, 1, 1)),
                created(holding("B", None, 1.0, 0.0), at(2024, 1, 2)),
                holding("C", None, 1.0, 0.0),
            ],
            &table,
        );
        let trend = ValuationService::new().build_value_trend(&enriched, 3.0);
        assert_eq!(trend[0].label, "Stock 1");
        assert_eq!(trend[1].label, "Jan 1");
        assert_eq!(trend[2].label, "Current");
    }

    #[test]
    fn same_timestamp_keeps_input_order() {
        let table = prices(&[("A", 1.0), ("B", 2.0), ("C", 3.0)]);
        let when = at(2024, 8, 20);
        let enriched = enrich(
            vec![
                created(holding("A", None, 1.0, 0.0), when),
                created(holding("B", None, 1.0, 0.0), when),
                created(holding("C", None, 1.0, 0.0), when),
            ],
            &table,
        );
        let trend = ValuationService::new().build_value_trend(&enriched, 6.0);
        assert_eq!(trend[0].value, 1.0);
        assert_eq!(trend[1].value, 3.0);
        assert_eq!(trend[0].label, "Aug 20");
    }

    #[test]
    fn does_not_reorder_input() {
        let table = prices(&[("A", 1.0), ("B", 1.0)]);
        let enriched = enrich(
            vec![
                created(holding("B", None, 1.0, 0.0), at(2024, 2, 1)),
                created(holding("A", None, 1.0, 0.0), at(2024, 1, 1)),
            ],
            &table,
        );
        let before = enriched.clone();
        ValuationService::new().build_value_trend(&enriched, 2.0);
        assert_eq!(enriched, before);
    }

    #[test]
    fn one_point_per_holding() {
        let table = prices(&[("A", 1.0)]);
        let raws: Vec<RawHolding> = (1..=12)
            .map(|m| created(holding("A", None, 1.0, 0.0), at(2023, m, 1)))
            .collect();
        let enriched = enrich(raws, &table);
        let trend = ValuationService::new().build_value_trend(&enriched, 12.0);
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[11].label, "Current");
        assert_eq!(trend[10].label, "Nov 1");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Dashboard
// ═══════════════════════════════════════════════════════════════════

mod dashboard {
    use super::*;

    #[test]
    fn empty_portfolio() {
        let d = ValuationService::new().compute_dashboard(Vec::new(), &prices(&[]));
        assert_eq!(d.summary.total_value, 0.0);
        assert_eq!(d.summary.total_cost, 0.0);
        assert_eq!(d.summary.total_pnl, 0.0);
        assert_eq!(d.summary.holdings_count, 0);
        assert!(d.holdings.is_empty());
        assert!(d.distribution.is_empty());
        assert!(d.pnl_by_symbol.is_empty());
        assert_eq!(d.value_trend.len(), 1);
        assert_eq!(d.value_trend[0].label, "No Data");
        assert_eq!(d.value_trend[0].value, 0.0);
    }

    #[test]
    fn sample_dashboard() {
        let (raws, table) = sample_portfolio();
        let d = ValuationService::new().compute_dashboard(raws, &table);

        assert_eq!(d.holdings.len(), 2);
        assert_eq!(d.holdings[0].holding.stock_symbol, "AAPL");
        assert_eq!(d.holdings[0].pnl_percent, 50.0);
        assert_eq!(d.holdings[1].pnl_percent, -10.0);

        assert_eq!(d.summary.total_value, 2400.0);
        assert_eq!(d.summary.total_cost, 2000.0);
        assert_eq!(d.summary.total_pnl, 400.0);
        assert_eq!(d.summary.holdings_count, 2);

        assert_eq!(d.distribution.len(), 2);
        assert_eq!((d.distribution[0].label.as_str(), d.distribution[0].value), ("X", 1500.0));
        assert_eq!((d.distribution[1].label.as_str(), d.distribution[1].value), ("Y", 900.0));

        assert_eq!(d.pnl_by_symbol.len(), 2);
        assert_eq!(d.value_trend.last().unwrap().value, d.summary.total_value);
        assert_eq!(d.value_trend.last().unwrap().label, "Current");
    }

    #[test]
    fn deterministic() {
        let (raws, table) = sample_portfolio();
        let svc = ValuationService::new();
        let first = svc.compute_dashboard(raws.clone(), &table);
        let second = svc.compute_dashboard(raws, &table);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn holdings_keep_delivery_order() {
        let table = prices(&[("A", 1.0), ("B", 1.0)]);
        let raws = vec![
            created(holding("B", None, 1.0, 0.0), at(2024, 2, 1)),
            created(holding("A", None, 1.0, 0.0), at(2024, 1, 1)),
        ];
        let d = ValuationService::new().compute_dashboard(raws, &table);
        assert_eq!(d.holdings[0].holding.stock_symbol, "B");
        assert_eq!(d.pnl_by_symbol[0].symbol, "B");
        // but the trend is chronological
        assert_eq!(d.value_trend[0].label, "Jan 1");
    }

    #[test]
    fn unpriced_holding_still_counted() {
        let raws = vec![holding("AAPL", Some("X"), 2.0, 10.0), holding("GONE", Some("X"), 1.0, 5.0)];
        let d = ValuationService::new().compute_dashboard(raws, &prices(&[("AAPL", 15.0)]));
        assert_eq!(d.summary.holdings_count, 2);
        assert_eq!(d.summary.total_value, 30.0);
        assert_eq!(d.summary.total_cost, 25.0);
        assert_eq!(d.summary.total_pnl, 5.0);
        assert_eq!(d.distribution.len(), 1);
        assert_eq!(d.distribution[0].value, 30.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Insights
// ═══════════════════════════════════════════════════════════════════

mod insights {
    use super::*;

    fn insights_of(raws: Vec<RawHolding>, table: &HashMap<String, f64>) -> PortfolioInsights {
        ValuationService::new().compute_dashboard(raws, table).insights
    }

    #[test]
    fn empty_portfolio() {
        let i = insights_of(Vec::new(), &prices(&[]));
        assert_eq!(i.best_performer, None);
        assert_eq!(i.worst_performer, None);
        assert_eq!(i.total_pnl_percent, 0.0);
        assert!(i.broker_shares.is_empty());
        assert_eq!(i.diversification_score, 0);
        assert_eq!(i, PortfolioInsights::default());
    }

    #[test]
    fn sample_insights() {
        let (raws, table) = sample_portfolio();
        let aapl_id = raws[0].id;
        let msft_id = raws[1].id;
        let i = insights_of(raws, &table);

        let best = i.best_performer.unwrap();
        assert_eq!(best.holding_id, aapl_id);
        assert_eq!(best.symbol, "AAPL");
        assert_eq!(best.broker, "X");
        assert_eq!(best.pnl, 500.0);
        assert_eq!(best.pnl_percent, 50.0);

        let worst = i.worst_performer.unwrap();
        assert_eq!(worst.holding_id, msft_id);
        assert_eq!(worst.pnl, -100.0);

        // 400 / 2000
        assert!((i.total_pnl_percent - 20.0).abs() < EPS);
        assert_eq!(i.diversification_score, 20);

        assert_eq!(i.broker_shares.len(), 2);
        assert_eq!(i.broker_shares[0].label, "X");
        assert!((i.broker_shares[0].percent - 62.5).abs() < EPS);
        assert!((i.broker_shares[1].percent - 37.5).abs() < EPS);
    }

    #[test]
    fn single_holding_is_best_and_worst() {
        let i = insights_of(vec![holding("AAPL", None, 1.0, 10.0)], &prices(&[("AAPL", 5.0)]));
        let best = i.best_performer.unwrap();
        let worst = i.worst_performer.unwrap();
        assert_eq!(best, worst);
        assert_eq!(best.broker, "Unknown");
        assert_eq!(best.pnl, -5.0);
        assert_eq!(i.diversification_score, 10);
        assert_eq!(i.broker_shares[0].percent, 100.0);
    }

    #[test]
    fn ties_pick_first_best_and_last_worst() {
        let raws = vec![
            holding("A", None, 1.0, 0.0),
            holding("B", None, 1.0, 0.0),
            holding("C", None, 1.0, 0.0),
        ];
        let ids: Vec<_> = raws.iter().map(|r| r.id).collect();
        let i = insights_of(raws, &prices(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]));
        assert_eq!(i.best_performer.unwrap().holding_id, ids[0]);
        assert_eq!(i.worst_performer.unwrap().holding_id, ids[2]);
    }

    #[test]
    fn zero_cost_and_zero_value_guards() {
        // free shares, no price: cost 0 and value 0
        let i = insights_of(vec![holding("Z", Some("X"), 3.0, 0.0)], &prices(&[]));
        assert_eq!(i.total_pnl_percent, 0.0);
        assert_eq!(i.broker_shares.len(), 1);
        assert_eq!(i.broker_shares[0].percent, 0.0);
    }

    #[test]
    fn diversification_caps_at_100() {
        let raws: Vec<RawHolding> = (0..15).map(|n| holding(&format!("S{n}"), None, 1.0, 1.0)).collect();
        let i = insights_of(raws, &prices(&[]));
        assert_eq!(i.diversification_score, 100);
    }

    #[test]
    fn shares_sum_to_100() {
        let table = prices(&[("A", 3.3), ("B", 7.7), ("C", 1.9)]);
        let raws = vec![
            holding("A", Some("X"), 1.5, 1.0),
            holding("B", Some("Y"), 2.0, 1.0),
            holding("C", Some("Z"), 9.0, 1.0),
        ];
        let i = insights_of(raws, &table);
        let total: f64 = i.broker_shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn wire_keys() {
        let (raws, table) = sample_portfolio();
        let d = ValuationService::new().compute_dashboard(raws, &table);
        let json = serde_json::to_value(&d).unwrap();
        let i = &json["insights"];
        for key in [
            "bestPerformer",
            "worstPerformer",
            "totalPnLPercent",
            "brokerShares",
            "diversificationScore",
        ] {
            assert!(i.get(key).is_some(), "missing {key}");
        }
        assert_eq!(i["bestPerformer"]["symbol"], "AAPL");
        assert_eq!(i["bestPerformer"]["pnlPercent"], 50.0);
    }
}
