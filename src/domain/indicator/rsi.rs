//! RSI (Relative Strength Index) with Wilder smoothing.
//!
//! gain = max(delta, 0), loss = max(-delta, 0), each smoothed with
//! alpha = 1/n, seeded by the first delta.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n positions are absent (the first has no delta).

use crate::domain::error::IndigridError;
use crate::domain::indicator_helpers::{deltas, wilder_smooth};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(closes: &[Option<f64>], period: usize) -> Result<Vec<Option<f64>>, IndigridError> {
    if period == 0 {
        return Err(IndigridError::invalid_parameter(
            "rsi",
            "period",
            "must be at least 1",
        ));
    }

    let changes = deltas(closes);
    let gains: Vec<Option<f64>> = changes.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Vec<Option<f64>> = changes.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let avg_gain = wilder_smooth(&gains, period);
    let avg_loss = wilder_smooth(&losses, period);

    Ok(avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => Some(rsi_from_averages(*g, *l)),
            _ => None,
        })
        .collect())
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
