//! One snapshot cycle.
//!
//! Fetch the book, resolve greeks and betas, aggregate, score risk,
//! and assemble the record set. Failures local to one contract degrade
//! that contract's fields to null; only a source-wide failure (or an
//! empty book) aborts the cycle.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use vanna_core::expiry::{days_to_expiry, expired_beyond_grace, time_to_expiry_years};
use vanna_core::{Contract, Position, Quote, Right};
use vanna_pricing::{
    black_scholes, fill_greeks, pct_move_to_double, pct_move_to_itm, prob_itm, PricingInputs,
};
use vanna_portfolio::{aggregate, PositionExposure};
use vanna_risk::{assess, run_scenarios, BetaResolver};
use vanna_traits::MarketDataSource;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::records::OutputRecord;

/// Everything a cycle needs, shared across cycles.
pub struct CycleContext {
    /// Positions, quotes, greeks and history.
    pub source: Arc<dyn MarketDataSource>,
    /// Per-symbol beta resolution with its process-lifetime caches.
    pub beta: BetaResolver,
    /// Engine configuration.
    pub config: EngineConfig,
}

/// Runs one complete cycle at `now`, returning the full record set in
/// emission order. Nothing is written here; the caller hands the
/// records to the writer after they are fully computed.
///
/// # Errors
///
/// [`EngineError::Source`] when the position fetch itself fails, and
/// [`EngineError::NoPositions`] when the book is empty; both skip the
/// cycle.
pub async fn run_cycle(ctx: &CycleContext, now: DateTime<Utc>) -> EngineResult<Vec<OutputRecord>> {
    let started = std::time::Instant::now();
    let positions = ctx.source.positions().await?;
    let positions: Vec<Position> = positions
        .into_iter()
        .filter(|p| !p.is_flat())
        .filter(|p| match p.contract.expiry {
            Some(expiry) => !expired_beyond_grace(expiry, now),
            None => true,
        })
        .collect();
    if positions.is_empty() {
        return Err(EngineError::NoPositions);
    }

    let benchmark_spot = fetch_benchmark_spot(ctx).await;

    let mut exposures = Vec::with_capacity(positions.len());
    for position in positions {
        exposures.push(resolve_exposure(ctx, position, now).await);
    }

    let symbols: BTreeSet<String> = exposures
        .iter()
        .map(|e| e.position.contract.symbol.clone())
        .collect();
    let mut betas = BTreeMap::new();
    for symbol in symbols {
        if let Some(beta) = ctx.beta.resolve(&symbol, &ctx.config.benchmark).await {
            betas.insert(symbol, beta);
        }
    }

    let (underlyings, snapshot) = aggregate(
        &exposures,
        &betas,
        &ctx.config.benchmark,
        benchmark_spot,
        now,
    )?;

    let stress = run_scenarios(
        &exposures,
        ctx.config.risk_free_rate,
        &ctx.config.dividend_yields,
        &snapshot,
    );
    let assessment = assess(&underlyings, &snapshot, &ctx.config.thresholds, stress);

    let mut records = Vec::with_capacity(exposures.len() + underlyings.len() + 2);
    for e in &exposures {
        records.push(position_record(ctx, e, now));
    }
    for u in &underlyings {
        records.push(OutputRecord::underlying(u, now));
    }
    records.push(OutputRecord::portfolio(&snapshot));
    records.push(OutputRecord::risk_assessment(&assessment, now));

    info!(
        positions = snapshot.position_count,
        underlyings = underlyings.len(),
        excluded = snapshot.excluded_count,
        flags = assessment.flags.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "cycle computed"
    );

    Ok(records)
}

async fn fetch_benchmark_spot(ctx: &CycleContext) -> Option<f64> {
    // Sources resolve stock quotes by symbol; the contract id is a
    // placeholder since the benchmark need not be a position.
    let contract = Contract::stock(&ctx.config.benchmark, 0);
    match ctx.source.quote(&contract).await {
        Ok(quote) => quote.valid_spot().or_else(|| quote.mid()),
        Err(err) => {
            warn!("{}: benchmark quote failed: {err}", ctx.config.benchmark);
            None
        }
    }
}

/// Joins one position to its market data, degrading to nulls on any
/// per-contract failure.
async fn resolve_exposure(
    ctx: &CycleContext,
    position: Position,
    now: DateTime<Utc>,
) -> PositionExposure {
    let contract = position.contract.clone();

    let quote = match ctx.source.quote(&contract).await {
        Ok(q) => q,
        Err(err) => {
            warn!("{}: quote failed: {err}", contract.symbol);
            Quote::default()
        }
    };

    if contract.right == Right::Stock {
        return PositionExposure {
            position,
            spot: quote.valid_spot().or_else(|| quote.mid()),
            greeks: None,
            time_to_expiry_years: None,
            option_price: None,
        };
    }

    let t_years = contract.expiry.map(|e| time_to_expiry_years(e, now));

    let vendor = match ctx.source.vendor_greeks(&contract).await {
        Ok(v) => v,
        Err(err) => {
            warn!("{}: vendor greeks failed: {err}", contract.symbol);
            None
        }
    };

    let dividend_yield = ctx.config.dividend_yields.get(&contract.symbol).copied();
    let greeks = t_years.map(|t| {
        fill_greeks(
            &contract,
            &quote,
            vendor.as_ref(),
            t,
            ctx.config.risk_free_rate,
            dividend_yield,
        )
    });

    // Mid if observable, else the model's fair value.
    let option_price = quote.mid().or_else(|| {
        let (spot, t) = (quote.valid_spot()?, t_years?);
        let iv = greeks.as_ref()?.iv?;
        let inputs = PricingInputs {
            spot,
            strike: contract.strike,
            time_to_expiry_years: t,
            rate: ctx.config.risk_free_rate,
            dividend_yield,
            right: contract.right,
        };
        black_scholes(&inputs, iv).ok().map(|g| g.price)
    });

    PositionExposure {
        position,
        spot: quote.valid_spot(),
        greeks: greeks.filter(|g| !g.is_empty()),
        time_to_expiry_years: t_years,
        option_price,
    }
}

fn position_record(ctx: &CycleContext, e: &PositionExposure, now: DateTime<Utc>) -> OutputRecord {
    let contract = &e.position.contract;
    if contract.right == Right::Stock {
        return OutputRecord::position(e, now, None, None, None, None);
    }

    let days = contract.expiry.map(|x| days_to_expiry(x, now));

    let analytics = e.spot.map(|spot| {
        let itm = pct_move_to_itm(spot, contract.strike, contract.right);
        let iv = e.greeks.as_ref().and_then(|g| g.iv);
        let prob = match (iv, e.time_to_expiry_years) {
            (Some(iv), Some(t)) => prob_itm(
                &PricingInputs {
                    spot,
                    strike: contract.strike,
                    time_to_expiry_years: t,
                    rate: ctx.config.risk_free_rate,
                    dividend_yield: ctx.config.dividend_yields.get(&contract.symbol).copied(),
                    right: contract.right,
                },
                iv,
            ),
            _ => None,
        };
        let double = match (
            e.greeks.as_ref().and_then(|g| g.delta),
            e.greeks.as_ref().and_then(|g| g.gamma),
            e.option_price,
        ) {
            (Some(delta), Some(gamma), Some(price)) => {
                pct_move_to_double(spot, contract.right, delta, gamma, price)
            }
            _ => None,
        };
        (prob, itm, double)
    });

    let (prob, itm, double) = analytics.unwrap_or((None, None, None));
    OutputRecord::position(e, now, days, prob, itm, double)
}
