//! Shared helpers for indicator calculations.
//!
//! All helpers treat an absent input as a gap: it is skipped, never read as
//! zero, and the output at that position is absent.

/// Exponentially weighted mean seeded with the first observation.
///
/// mean[t] = alpha * x[t] + (1 - alpha) * mean[t-1], applied over the present
/// values in order. A gap does not decay the previous mean: weights follow
/// the count of present values, not their positions. A position is emitted
/// once at least `min_periods` observations have been folded in.
pub fn ewm_mean(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let min_periods = min_periods.max(1);

    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|x| (i, x)))
        .fold((None::<f64>, 0usize), |(prev, seen), (i, x)| {
            let mean = match prev {
                None => x,
                Some(p) => alpha * x + (1.0 - alpha) * p,
            };
            let seen = seen + 1;
            if seen >= min_periods {
                out[i] = Some(mean);
            }
            (Some(mean), seen)
        });

    out
}

/// Wilder's moving average: alpha = 1/length, nothing emitted before
/// `length` observations. `length` must be non-zero.
pub fn wilder_smooth(values: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
    ewm_mean(values, 1.0 / length as f64, length)
}

/// Difference to the previous position; absent at index 0 or when either
/// side is absent.
pub fn deltas(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, cur)| {
            let prev = values.get(i.checked_sub(1)?)?;
            Some((*cur)? - (*prev)?)
        })
        .collect()
}

/// The `length` values ending at `end`, or `None` if the window is not
/// full or holds a gap.
pub fn full_window(values: &[Option<f64>], end: usize, length: usize) -> Option<Vec<f64>> {
    if length == 0 || end >= values.len() || end + 1 < length {
        return None;
    }
    values[end + 1 - length..=end].iter().copied().collect()
}

/// max(high - low, |high - prev_close|, |low - prev_close|)
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}
