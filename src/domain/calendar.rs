//! Master date axis and day-first date handling.

use crate::domain::error::IndigridError;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Textual date format used on input and output tables.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Chronologically ascending, duplicate-free dates shared by every symbol
/// of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MasterDateAxis {
    dates: Vec<NaiveDate>,
}

impl MasterDateAxis {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        let unique: BTreeSet<NaiveDate> = dates.into_iter().collect();
        Self {
            dates: unique.into_iter().collect(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Keep only the `count` most recent dates.
    pub fn most_recent(&self, count: usize) -> Self {
        let start = self.dates.len().saturating_sub(count);
        Self {
            dates: self.dates[start..].to_vec(),
        }
    }
}

/// Parse a day-first `dd.mm.yyyy` date. `dd/mm/yyyy` and ISO `yyyy-mm-dd`
/// are accepted too.
pub fn parse_date(value: &str) -> Result<NaiveDate, IndigridError> {
    let trimmed = value.trim();
    [DATE_FORMAT, "%d/%m/%Y", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| IndigridError::DateParse {
            value: value.to_string(),
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
