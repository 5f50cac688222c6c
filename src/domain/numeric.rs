//! Numeric cleaning of raw price cells.
//!
//! Every character other than a digit, comma, period or minus sign is
//! dropped, commas become periods, and whatever remains is parsed as a
//! float. Every remaining period is a decimal point: no thousands-separator
//! detection is attempted here. Anything unparsable is absent.

/// Clean a single textual cell into an optional finite float.
pub fn clean_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "NA" {
        return None;
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return None;
    }

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Clean a column of textual cells.
pub fn clean_cells<S: AsRef<str>>(cells: &[S]) -> Vec<Option<f64>> {
    cells.iter().map(|c| clean_cell(c.as_ref())).collect()
}
