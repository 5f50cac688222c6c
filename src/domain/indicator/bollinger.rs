//! Bollinger %B.
//!
//! Bands over the trailing n closes:
//! - Middle: Simple Moving Average (SMA)
//! - Upper/Lower: Middle ± (multiplier × StdDev), population StdDev
//!
//! %B = (close - lower) / (upper - lower)
//!
//! Default parameters: length=20, multiplier=2.0
//! Warmup: first (length-1) positions are absent. A window with a gap, or
//! with zero width (constant prices), is absent.

use crate::domain::error::IndigridError;
use crate::domain::indicator::BbpParams;
use crate::domain::indicator_helpers::full_window;

pub const DEFAULT_LENGTH: usize = 20;
pub const DEFAULT_MULT: f64 = 2.0;

pub fn calculate_bbp(closes: &[Option<f64>], params: &BbpParams) -> Result<Vec<Option<f64>>, IndigridError> {
    if params.length == 0 {
        return Err(IndigridError::invalid_parameter(
            "bbp_manual",
            "length",
            "must be at least 1",
        ));
    }
    if !(params.mult.is_finite() && params.mult > 0.0) {
        return Err(IndigridError::invalid_parameter(
            "bbp_manual",
            "mult",
            "must be a positive number",
        ));
    }

    Ok((0..closes.len())
        .map(|i| {
            let window = full_window(closes, i, params.length)?;
            let price = closes[i]?;
            percent_b(&window, price, params.mult)
        })
        .collect())
}

fn percent_b(window: &[f64], price: f64, mult: f64) -> Option<f64> {
    let n = window.len() as f64;
    let middle = window.iter().sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|x| {
            let diff = x - middle;
            diff * diff
        })
        .sum::<f64>()
        / n;
    let stddev = variance.sqrt();

    let lower = middle - mult * stddev;
    let width = 2.0 * mult * stddev;
    if !width.is_finite() || width <= f64::EPSILON * middle.abs().max(1.0) {
        return None;
    }
    Some((price - lower) / width)
}
