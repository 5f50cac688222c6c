//! Exponential Moving Average seeded with a simple mean.
//!
//! k = 2/(n+1). The first n present closes are averaged to seed the EMA at
//! the n-th present close; each later present close x gives
//! EMA = k*x + (1-k)*EMA_prev. Gaps are skipped.
//! Warmup: positions up to the n-th present close (exclusive) are absent.

use crate::domain::error::IndigridError;

pub const DEFAULT_LENGTH: usize = 20;

pub fn calculate_ema(closes: &[Option<f64>], length: usize) -> Result<Vec<Option<f64>>, IndigridError> {
    if length == 0 {
        return Err(IndigridError::invalid_parameter(
            "ema",
            "length",
            "must be at least 1",
        ));
    }
    Ok(sma_seeded_ema(closes, length))
}

/// EMA over the present values of `values`, seeded by the mean of the first
/// `length` of them. All absent when fewer than `length` values are present.
pub fn sma_seeded_ema(values: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let observed: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|x| (i, x)))
        .collect();

    if length == 0 || observed.len() < length {
        return out;
    }

    let k = 2.0 / (length as f64 + 1.0);
    let seed = observed[..length].iter().map(|(_, x)| x).sum::<f64>() / length as f64;
    out[observed[length - 1].0] = Some(seed);

    observed[length..].iter().fold(seed, |prev, &(i, x)| {
        let ema = k * x + (1.0 - k) * prev;
        out[i] = Some(ema);
        ema
    });

    out
}
