//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow), both SMA-seeded
//! Signal Line = EMA(signal) of MACD Line, seeded by its first value
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: the line starts with the slower EMA; the signal and histogram
//! need `signal` more line values.

use crate::domain::error::IndigridError;
use crate::domain::indicator::ema::sma_seeded_ema;
use crate::domain::indicator::{MacdComponent, MacdParams};
use crate::domain::indicator_helpers::ewm_mean;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl MacdOutput {
    pub fn component(&self, component: MacdComponent) -> &[Option<f64>] {
        match component {
            MacdComponent::Line => &self.line,
            MacdComponent::Signal => &self.signal,
            MacdComponent::Histogram => &self.histogram,
        }
    }
}

pub fn calculate_macd(closes: &[Option<f64>], params: &MacdParams) -> Result<MacdOutput, IndigridError> {
    for (name, value) in [
        ("fast", params.fast),
        ("slow", params.slow),
        ("signal", params.signal),
    ] {
        if value == 0 {
            return Err(IndigridError::invalid_parameter(
                "macd",
                name,
                "must be at least 1",
            ));
        }
    }

    let fast = sma_seeded_ema(closes, params.fast);
    let slow = sma_seeded_ema(closes, params.slow);
    let line = difference(&fast, &slow);

    let k = 2.0 / (params.signal as f64 + 1.0);
    let signal = ewm_mean(&line, k, params.signal);
    let histogram = difference(&line, &signal);

    Ok(MacdOutput {
        line,
        signal,
        histogram,
    })
}

fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| Some((*x)? - (*y)?))
        .collect()
}
