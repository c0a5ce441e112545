//! Vendor/model greeks fill.
//!
//! The vendor feed may supply a full greeks set, a partial one, or
//! nothing at all. This module fills the gaps with the model, one field
//! at a time: a vendor field is never overwritten, and a model failure
//! leaves the field null rather than failing the position.

use log::{debug, warn};

use vanna_core::{Contract, GreeksSet, Quote};

use crate::black_scholes::{black_scholes, PricingInputs};
use crate::implied_vol::implied_vol;

/// Fills the null fields of a vendor greeks set (or builds one from
/// scratch) for one option contract.
///
/// Resolution order for the model's volatility input: the vendor IV if
/// present, else a bisection solve from the quote's mid price. With a
/// vol and a valid spot in hand the model evaluates once and every null
/// field is taken from it. Expired contracts (`t_years <= 0`) evaluate
/// on the intrinsic path.
///
/// Returns whatever could be resolved; an all-null set means the
/// position is excluded from aggregated totals but still emitted for
/// audit.
#[must_use]
pub fn fill_greeks(
    contract: &Contract,
    quote: &Quote,
    vendor: Option<&GreeksSet>,
    t_years: f64,
    rate: f64,
    dividend_yield: Option<f64>,
) -> GreeksSet {
    let mut set = vendor.copied().unwrap_or_default();

    let Some(spot) = quote.valid_spot() else {
        if set.is_empty() {
            warn!("{}: no spot price, greeks unresolvable", contract.symbol);
        }
        return set;
    };
    if contract.strike <= 0.0 {
        return set;
    }

    let inputs = PricingInputs {
        spot,
        strike: contract.strike,
        time_to_expiry_years: t_years,
        rate,
        dividend_yield,
        right: contract.right,
    };

    // Vol for the model: vendor IV first, else back it out of the
    // observed price.
    let iv = match set.iv {
        Some(iv) if iv > 0.0 => Some(iv),
        _ if t_years > 0.0 => match quote.mid() {
            Some(mid) => match implied_vol(&inputs, mid) {
                Ok(iv) => {
                    debug!("{}: backsolved iv={:.4}", contract.symbol, iv);
                    Some(iv)
                }
                Err(err) => {
                    warn!("{}: iv solve failed: {}", contract.symbol, err);
                    None
                }
            },
            None => {
                warn!("{}: no usable option price for iv solve", contract.symbol);
                None
            }
        },
        // Expired: the intrinsic path needs no vol.
        _ => Some(0.0),
    };

    let Some(iv) = iv else {
        return set;
    };

    match black_scholes(&inputs, iv) {
        Ok(model) => set.fill_missing_from(&model.to_greeks_set()),
        Err(err) => warn!("{}: model evaluation failed: {}", contract.symbol, err),
    }

    set
}
