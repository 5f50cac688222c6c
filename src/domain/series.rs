//! Price and indicator series.
//!
//! A series is a date index paired with optional values of the same length.
//! Calculators work on the bare value slices; the date index is attached
//! when results become an [`IndicatorSeries`].

use chrono::NaiveDate;
use std::fmt;

/// Which column of the price table a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Close,
    High,
    Low,
}

impl PriceField {
    pub const ALL: [PriceField; 3] = [PriceField::Close, PriceField::High, PriceField::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Close => "close",
            PriceField::High => "high",
            PriceField::Low => "low",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleaned close/high/low series of one symbol on a shared ascending index.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolPrices {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
}

impl SymbolPrices {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn field(&self, field: PriceField) -> &[Option<f64>] {
        match field {
            PriceField::Close => &self.close,
            PriceField::High => &self.high,
            PriceField::Low => &self.low,
        }
    }
}

/// Indicator output for one symbol, rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Attach dates to raw calculator output, rounding every present value.
    pub fn from_raw(dates: &[NaiveDate], raw: &[Option<f64>]) -> Self {
        let values = raw.iter().map(|v| v.and_then(round2)).collect();
        Self {
            dates: dates.to_vec(),
            values,
        }
    }

    /// A series of the given index with every value absent.
    pub fn absent(dates: &[NaiveDate]) -> Self {
        Self {
            dates: dates.to_vec(),
            values: vec![None; dates.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_all_absent(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn first_valid_date(&self) -> Option<NaiveDate> {
        self.dates
            .iter()
            .zip(&self.values)
            .find(|(_, v)| v.is_some())
            .map(|(d, _)| *d)
    }
}

/// Round to two decimal places, exact binary ties to even. Non-finite input
/// is absent, negative zero collapses to zero.
pub fn round2(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let rounded = format!("{value:.2}").parse::<f64>().ok()?;
    Some(if rounded == 0.0 { 0.0 } else { rounded })
}
