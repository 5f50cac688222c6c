//! Williams %R.
//!
//! %R = -100 × (highest high - close) / (highest high - lowest low) over the
//! trailing n positions. Warmup: first (n-1) positions are absent; a flat
//! range is absent.

use crate::domain::error::IndigridError;
use crate::domain::indicator_helpers::full_window;

pub const DEFAULT_LENGTH: usize = 14;

pub fn calculate_williams_r(
    high: &[Option<f64>],
    low: &[Option<f64>],
    close: &[Option<f64>],
    length: usize,
) -> Result<Vec<Option<f64>>, IndigridError> {
    if length == 0 {
        return Err(IndigridError::invalid_parameter(
            "williamsr",
            "length",
            "must be at least 1",
        ));
    }
    if high.len() != close.len() || low.len() != close.len() {
        return Err(IndigridError::MalformedTable {
            table: "williamsr input".into(),
            reason: "high, low and close lengths differ".into(),
        });
    }

    Ok((0..close.len())
        .map(|i| {
            let highs = full_window(high, i, length)?;
            let lows = full_window(low, i, length)?;
            let price = close[i]?;
            let highest = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lowest = lows.iter().copied().fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            if range <= 0.0 {
                return None;
            }
            Some(-100.0 * (highest - price) / range)
        })
        .collect())
}
