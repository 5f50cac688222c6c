//! Directional movement oscillator (DI+ minus DI-).
//!
//! up = high - prev_high, down = prev_low - low
//! +DM = up if up > down and up > 0, else 0
//! -DM = down if down > up and down > 0, else 0
//! TR  = max(high - low, |high - prev_close|, |low - prev_close|)
//!
//! +DM, -DM and TR are Wilder-smoothed (alpha = 1/n) and
//! DIOSC = 100 × (+DM_s - -DM_s) / TR_s.
//!
//! Warmup: first n positions are absent (the first has no previous day).

use crate::domain::error::IndigridError;
use crate::domain::indicator_helpers::{true_range, wilder_smooth};

pub const DEFAULT_LENGTH: usize = 14;

struct DirectionalMove {
    plus: f64,
    minus: f64,
    true_range: f64,
}

pub fn calculate_diosc(
    high: &[Option<f64>],
    low: &[Option<f64>],
    close: &[Option<f64>],
    length: usize,
) -> Result<Vec<Option<f64>>, IndigridError> {
    if length == 0 {
        return Err(IndigridError::invalid_parameter(
            "diosc",
            "length",
            "must be at least 1",
        ));
    }
    if high.len() != close.len() || low.len() != close.len() {
        return Err(IndigridError::MalformedTable {
            table: "diosc input".into(),
            reason: "high, low and close lengths differ".into(),
        });
    }

    let moves: Vec<Option<DirectionalMove>> = (0..close.len())
        .map(|i| directional_move(high, low, close, i))
        .collect();

    let plus: Vec<Option<f64>> = moves.iter().map(|m| m.as_ref().map(|m| m.plus)).collect();
    let minus: Vec<Option<f64>> = moves.iter().map(|m| m.as_ref().map(|m| m.minus)).collect();
    let tr: Vec<Option<f64>> = moves
        .iter()
        .map(|m| m.as_ref().map(|m| m.true_range))
        .collect();

    let plus_s = wilder_smooth(&plus, length);
    let minus_s = wilder_smooth(&minus, length);
    let tr_s = wilder_smooth(&tr, length);

    Ok(plus_s
        .iter()
        .zip(&minus_s)
        .zip(&tr_s)
        .map(|((p, m), t)| {
            let (p, m, t) = ((*p)?, (*m)?, (*t)?);
            if t <= 0.0 {
                return None;
            }
            Some(100.0 * (p - m) / t)
        })
        .collect())
}

fn directional_move(
    high: &[Option<f64>],
    low: &[Option<f64>],
    close: &[Option<f64>],
    i: usize,
) -> Option<DirectionalMove> {
    let prev = i.checked_sub(1)?;
    let (h, l) = (high[i]?, low[i]?);
    let (prev_h, prev_l, prev_c) = (high[prev]?, low[prev]?, close[prev]?);

    let up = h - prev_h;
    let down = prev_l - l;
    let plus = if up > down && up > 0.0 { up } else { 0.0 };
    let minus = if down > up && down > 0.0 { down } else { 0.0 };

    Some(DirectionalMove {
        plus,
        minus,
        true_range: true_range(h, l, prev_c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn trend(n: usize, step: f64) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
        let high: Vec<f64> = (0..n).map(|i| 10.0 + step * i as f64).collect();
        let low: Vec<f64> = (0..n).map(|i| 8.0 + step * i as f64).collect();
        let close: Vec<f64> = (0..n).map(|i| 9.0 + step * i as f64).collect();
        (some(&high), some(&low), some(&close))
    }

    #[test]
    fn diosc_warmup() {
        let (h, l, c) = trend(20, 1.0);
        let series = calculate_diosc(&h, &l, &c, 14).unwrap();
        for v in &series[..14] {
            assert!(v.is_none());
        }
        assert!(series[14].is_some());
    }

    #[test]
    fn diosc_steady_uptrend() {
        // +DM = 1, -DM = 0, TR = 2 every day
        let (h, l, c) = trend(10, 1.0);
        let series = calculate_diosc(&h, &l, &c, 3).unwrap();
        for v in series.iter().skip(3) {
            assert_relative_eq!(v.unwrap(), 50.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn diosc_steady_downtrend() {
        let (h, l, c) = trend(10, -1.0);
        let series = calculate_diosc(&h, &l, &c, 3).unwrap();
        for v in series.iter().skip(3) {
            assert_relative_eq!(v.unwrap(), -50.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn diosc_inside_day_counts_neither_move() {
        let h = some(&[10.0, 9.5]);
        let l = some(&[8.0, 8.5]);
        let c = some(&[9.0, 9.0]);
        let m = directional_move(&h, &l, &c, 1).unwrap();
        assert_relative_eq!(m.plus, 0.0);
        assert_relative_eq!(m.minus, 0.0);
        assert_relative_eq!(m.true_range, 1.0);
    }

    #[test]
    fn diosc_flat_prices_are_absent() {
        let flat = some(&[5.0; 10]);
        let series = calculate_diosc(&flat, &flat, &flat, 3).unwrap();
        assert!(series.iter().all(Option::is_none));
    }

    #[test]
    fn diosc_short_input_is_all_absent() {
        let (h, l, c) = trend(14, 1.0);
        let series = calculate_diosc(&h, &l, &c, 14).unwrap();
        assert!(series.iter().all(Option::is_none));
    }

    #[test]
    fn diosc_zero_length_is_a_fault() {
        let (h, l, c) = trend(5, 1.0);
        assert!(calculate_diosc(&h, &l, &c, 0).is_err());
    }
}
