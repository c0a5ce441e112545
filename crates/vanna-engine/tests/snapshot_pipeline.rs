//! End-to-end snapshot pipeline tests over the in-memory source.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use vanna_core::{Contract, GreeksSet, GreeksSource, Position, Quote, Right};
use vanna_engine::{run_cycle, CycleContext, EngineConfig, OutputConfig, OutputRecord, SnapshotWriter};
use vanna_risk::{BetaConfig, BetaResolver};
use vanna_traits::{MarketDataSource, ReturnSeries, StaticMarketData};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0).unwrap()
}

fn context(src: StaticMarketData) -> CycleContext {
    let source: Arc<dyn MarketDataSource> = Arc::new(src);
    CycleContext {
        beta: BetaResolver::new(source.clone(), BetaConfig::default()),
        source,
        config: EngineConfig::default(),
    }
}

fn quote(bid: f64, ask: f64, spot: f64) -> Quote {
    Quote {
        bid: Some(bid),
        ask: Some(ask),
        last: None,
        close: None,
        spot: Some(spot),
    }
}

fn returns(symbol: &str, scale: f64) -> ReturnSeries {
    let points = (0..90u32)
        .map(|i| {
            let d = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap() + chrono::Days::new(u64::from(i));
            (d, scale * (0.004 * f64::from(i % 9) - 0.016))
        })
        .collect();
    ReturnSeries::new(symbol, points)
}

fn vendor_delta_half() -> GreeksSet {
    GreeksSet {
        iv: Some(0.3),
        delta: Some(0.5),
        gamma: Some(0.01),
        vega: Some(0.2),
        theta: Some(-0.05),
        source: GreeksSource::Vendor,
    }
}

/// Single long call, delta 0.5, quantity 2, multiplier 100: 50 dollar
/// delta per contract and 100 net delta shares on the underlying.
#[tokio::test]
async fn scenario_long_call_contract_scaling() {
    let src = StaticMarketData::new();
    let call = Contract::option(
        "NVDA",
        NaiveDate::from_ymd_opt(2026, 9, 18).unwrap(),
        Right::Call,
        160.0,
        1,
    );
    src.set_position(Position::new("U100", call.clone(), 2.0, 10.0));
    src.set_quote(&call, quote(14.0, 14.4, 160.0));
    src.set_vendor_greeks(&call, vendor_delta_half());

    let records = run_cycle(&context(src), now()).await.unwrap();

    let option = records
        .iter()
        .find(|r| matches!(r, OutputRecord::Option { .. }))
        .unwrap();
    if let OutputRecord::Option { delta, delta_contract, .. } = option {
        assert_eq!(*delta, Some(0.5));
        assert_eq!(*delta_contract, Some(50.0));
    }

    let underlying = records
        .iter()
        .find(|r| matches!(r, OutputRecord::Underlying { .. }))
        .unwrap();
    if let OutputRecord::Underlying { net_delta_shares, .. } = underlying {
        assert!((net_delta_shares - 100.0).abs() < 1e-9);
    }
}

/// An expired, zero-vol option evaluates on the intrinsic path with
/// zero gamma/vega/theta.
#[tokio::test]
async fn scenario_expired_option_intrinsic_greeks() {
    let src = StaticMarketData::new();
    // Expiry earlier today; the cycle runs within the grace window.
    let expiry = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let call = Contract::option("NVDA", expiry, Right::Call, 100.0, 1);
    src.set_position(Position::new("U100", call.clone(), 1.0, 10.0));
    src.set_quote(&call, quote(9.9, 10.1, 110.0));

    // 10am ET on expiry day is before the 4pm close, so force the
    // evaluation past the close instead.
    let after_close = Utc.with_ymd_and_hms(2026, 3, 2, 22, 0, 0).unwrap();
    let records = run_cycle(&context(src), after_close).await.unwrap();

    let option = records
        .iter()
        .find(|r| matches!(r, OutputRecord::Option { .. }))
        .unwrap();
    if let OutputRecord::Option { delta, gamma, vega, theta, days_to_exp, .. } = option {
        assert_eq!(*delta, Some(1.0));
        assert_eq!(*gamma, Some(0.0));
        assert_eq!(*vega, Some(0.0));
        assert_eq!(*theta, Some(0.0));
        assert_eq!(*days_to_exp, Some(0));
    }
}

/// A flat benchmark return series leaves beta null: the symbol drops
/// out of the beta-weighted total but stays in the raw total.
#[tokio::test]
async fn scenario_flat_benchmark_beta_null() {
    let src = StaticMarketData::new();
    let stock = Contract::stock("NVDA", 1);
    src.set_position(Position::new("U100", stock.clone(), 100.0, 150.0));
    src.set_quote(&stock, quote(159.9, 160.1, 160.0));
    src.set_returns(returns("NVDA", 2.0));
    src.set_returns(ReturnSeries::new(
        "SPY",
        (0..90u32)
            .map(|i| {
                let d = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
                    + chrono::Days::new(u64::from(i));
                (d, 0.0)
            })
            .collect(),
    ));

    let records = run_cycle(&context(src), now()).await.unwrap();

    let underlying = records
        .iter()
        .find(|r| matches!(r, OutputRecord::Underlying { .. }))
        .unwrap();
    if let OutputRecord::Underlying { beta, beta_weighted_dollar_delta, net_delta_shares, .. } =
        underlying
    {
        assert_eq!(*beta, None);
        assert_eq!(*beta_weighted_dollar_delta, None);
        assert!((net_delta_shares - 100.0).abs() < 1e-9);
    }

    let portfolio = records
        .iter()
        .find(|r| matches!(r, OutputRecord::Portfolio { .. }))
        .unwrap();
    if let OutputRecord::Portfolio { raw_delta_shares, beta_weighted_dollar_delta, .. } = portfolio
    {
        assert!((raw_delta_shares - 100.0).abs() < 1e-9);
        assert_eq!(*beta_weighted_dollar_delta, 0.0);
    }
}

/// An option with no vendor greeks and no usable price still emits a
/// record, with null greeks, and is excluded from totals.
#[tokio::test]
async fn scenario_unresolvable_option_audited_not_counted() {
    let src = StaticMarketData::new();
    let call = Contract::option(
        "NVDA",
        NaiveDate::from_ymd_opt(2026, 9, 18).unwrap(),
        Right::Call,
        160.0,
        1,
    );
    src.set_position(Position::new("U100", call.clone(), 5.0, 10.0));
    // Spot present, but no bid/ask/last/close: the IV solve has no
    // target price and the vendor supplied nothing.
    src.set_quote(
        &call,
        Quote {
            spot: Some(160.0),
            ..Quote::default()
        },
    );

    let stock = Contract::stock("SPY", 2);
    src.set_position(Position::new("U100", stock.clone(), 10.0, 500.0));
    src.set_quote(&stock, quote(559.9, 560.1, 560.0));

    let records = run_cycle(&context(src), now()).await.unwrap();

    let option = records
        .iter()
        .find(|r| matches!(r, OutputRecord::Option { .. }))
        .unwrap();
    if let OutputRecord::Option { iv, delta, gamma, vega, theta, greeks_source, .. } = option {
        assert_eq!(*iv, None);
        assert_eq!(*delta, None);
        assert_eq!(*gamma, None);
        assert_eq!(*vega, None);
        assert_eq!(*theta, None);
        assert_eq!(*greeks_source, None);
    }

    let portfolio = records
        .iter()
        .find(|r| matches!(r, OutputRecord::Portfolio { .. }))
        .unwrap();
    if let OutputRecord::Portfolio { raw_delta_shares, excluded_count, benchmark_spot, .. } =
        portfolio
    {
        assert!((raw_delta_shares - 10.0).abs() < 1e-9);
        assert_eq!(*excluded_count, 1);
        // The SPY quote was keyed under its own contract id; the
        // benchmark lookup finds it by symbol.
        assert_eq!(*benchmark_spot, Some(560.0));
    }
}

/// Identical inputs at the same instant serialize to byte-identical
/// record lines.
#[tokio::test]
async fn idempotent_cycles_byte_identical() {
    let src = StaticMarketData::new();
    let call = Contract::option(
        "NVDA",
        NaiveDate::from_ymd_opt(2026, 9, 18).unwrap(),
        Right::Call,
        160.0,
        1,
    );
    src.set_position(Position::new("U100", call.clone(), 2.0, 10.0));
    src.set_quote(&call, quote(14.0, 14.4, 160.0));
    src.set_vendor_greeks(&call, vendor_delta_half());
    src.set_returns(returns("NVDA", 1.5));
    src.set_returns(returns("SPY", 1.0));

    let ctx = context(src);
    let serialize = |records: &[OutputRecord]| -> Vec<String> {
        records
            .iter()
            .map(|r| serde_json::to_string(r).unwrap())
            .collect()
    };

    let first = serialize(&run_cycle(&ctx, now()).await.unwrap());
    let second = serialize(&run_cycle(&ctx, now()).await.unwrap());
    assert_eq!(first, second);
}

/// The latest-only target always holds a complete snapshot: the
/// previous file survives until the new one fully replaces it.
#[tokio::test]
async fn latest_target_replaced_whole() {
    let dir = tempfile::tempdir().unwrap();
    let latest = dir.path().join("latest.ndjson");
    let writer = SnapshotWriter::new(&OutputConfig {
        latest_path: Some(latest.clone()),
        history_path: None,
    });

    let src = StaticMarketData::new();
    let stock = Contract::stock("SPY", 1);
    src.set_position(Position::new("U100", stock.clone(), 100.0, 500.0));
    src.set_quote(&stock, quote(559.9, 560.1, 560.0));
    let ctx = context(src);

    let records = run_cycle(&ctx, now()).await.unwrap();
    writer.write_cycle(&records).unwrap();
    let before = std::fs::read_to_string(&latest).unwrap();

    // A stale temporary from a crashed predecessor must not leak into
    // the next replace.
    std::fs::write(latest.with_extension("tmp"), "garbage").unwrap();
    let later = now() + chrono::Duration::seconds(2);
    writer.write_cycle(&run_cycle(&ctx, later).await.unwrap()).unwrap();

    let after = std::fs::read_to_string(&latest).unwrap();
    assert!(!latest.with_extension("tmp").exists());
    assert_eq!(before.lines().count(), after.lines().count());
    for line in after.lines() {
        let record: OutputRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.timestamp(), later);
    }
}

/// Every record in a cycle carries the cycle timestamp, and the record
/// set covers all five scopes.
#[tokio::test]
async fn one_timestamp_all_scopes() {
    let src = StaticMarketData::new();
    let call = Contract::option(
        "NVDA",
        NaiveDate::from_ymd_opt(2026, 9, 18).unwrap(),
        Right::Call,
        160.0,
        1,
    );
    src.set_position(Position::new("U100", call.clone(), 1.0, 10.0));
    src.set_quote(&call, quote(14.0, 14.4, 160.0));
    let stock = Contract::stock("SPY", 2);
    src.set_position(Position::new("U100", stock.clone(), 10.0, 500.0));
    src.set_quote(&stock, quote(559.9, 560.1, 560.0));

    let records = run_cycle(&context(src), now()).await.unwrap();
    assert!(records.iter().all(|r| r.timestamp() == now()));

    let has = |f: fn(&OutputRecord) -> bool| records.iter().any(f);
    assert!(has(|r| matches!(r, OutputRecord::Option { .. })));
    assert!(has(|r| matches!(r, OutputRecord::Stock { .. })));
    assert!(has(|r| matches!(r, OutputRecord::Underlying { .. })));
    assert!(has(|r| matches!(r, OutputRecord::Portfolio { .. })));
    assert!(has(|r| matches!(r, OutputRecord::RiskAssessment { .. })));
}
