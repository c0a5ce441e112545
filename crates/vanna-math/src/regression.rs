//! Ordinary-least-squares beta.
//!
//! Beta of an asset versus a benchmark is the slope of the OLS
//! regression of the asset's daily returns on the benchmark's:
//!
//! ```text
//! beta = Cov(r_sym, r_bench) / Var(r_bench)
//! ```
//!
//! Series are aligned pairwise before the estimate: a date missing on
//! either side drops that date from both series.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{MathError, MathResult};

/// Aligns two keyed series into paired samples, dropping keys that are
/// not present on both sides. Pairs are returned in the key order of
/// the first series.
pub fn align_by_key<K, I, J>(a: I, b: J) -> Vec<(f64, f64)>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, f64)>,
    J: IntoIterator<Item = (K, f64)>,
{
    let rhs: HashMap<K, f64> = b.into_iter().collect();
    a.into_iter()
        .filter_map(|(k, va)| rhs.get(&k).map(|vb| (va, *vb)))
        .collect()
}

/// OLS slope of `y` on `x` over paired samples `(y_i, x_i)`.
///
/// # Errors
///
/// [`MathError::InsufficientData`] when fewer than `min_samples` pairs
/// are available; [`MathError::Degenerate`] when the benchmark variance
/// is zero (e.g. a constant return series), in which case no slope is
/// defined.
pub fn ols_beta(pairs: &[(f64, f64)], min_samples: usize) -> MathResult<f64> {
    if pairs.len() < min_samples {
        return Err(MathError::InsufficientData {
            required: min_samples,
            actual: pairs.len(),
        });
    }

    let n = pairs.len() as f64;
    let mean_y = pairs.iter().map(|(y, _)| y).sum::<f64>() / n;
    let mean_x = pairs.iter().map(|(_, x)| x).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (y, x) in pairs {
        cov += (y - mean_y) * (x - mean_x);
        var_x += (x - mean_x) * (x - mean_x);
    }

    if var_x == 0.0 {
        return Err(MathError::degenerate("benchmark variance", var_x));
    }

    Ok(cov / var_x)
}
