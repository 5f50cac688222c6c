//! Rectangular price tables (input) and indicator tables (output).

use crate::domain::calendar::MasterDateAxis;
use crate::domain::error::IndigridError;
use crate::domain::numeric::clean_cell;
use crate::domain::series::{PriceField, SymbolPrices};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A dates × symbols table of raw textual cells, as delivered by a price
/// source. `columns[k].1[r]` is the cell of symbol k on `dates[r]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceTable {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<(String, Vec<String>)>,
}

impl PriceTable {
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(s, _)| s.as_str())
    }

    pub fn column(&self, symbol: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, cells)| cells.as_slice())
    }

    /// The symbol's cleaned values reindexed onto `master`, or `None` when
    /// the table has no such column. For a date listed twice the later row
    /// wins.
    pub fn series_on(
        &self,
        symbol: &str,
        master: &MasterDateAxis,
    ) -> Result<Option<Vec<Option<f64>>>, IndigridError> {
        let Some(cells) = self.column(symbol) else {
            return Ok(None);
        };
        if cells.len() != self.dates.len() {
            return Err(IndigridError::MalformedTable {
                table: self.name.clone(),
                reason: format!(
                    "column {symbol} has {} cells for {} dates",
                    cells.len(),
                    self.dates.len()
                ),
            });
        }

        let by_date: HashMap<NaiveDate, Option<f64>> = self
            .dates
            .iter()
            .copied()
            .zip(cells.iter().map(|c| clean_cell(c)))
            .collect();

        Ok(Some(
            master
                .dates()
                .iter()
                .map(|d| by_date.get(d).copied().flatten())
                .collect(),
        ))
    }
}

/// The close, high and low tables of one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceTables {
    pub close: PriceTable,
    pub high: PriceTable,
    pub low: PriceTable,
}

impl PriceTables {
    /// The master axis: every close date, ascending and unique, limited to
    /// the `max_dates` most recent when given.
    pub fn master_axis(&self, max_dates: Option<usize>) -> MasterDateAxis {
        let axis = MasterDateAxis::new(self.close.dates.iter().copied());
        match max_dates {
            Some(n) => axis.most_recent(n),
            None => axis,
        }
    }

    pub fn table(&self, field: PriceField) -> &PriceTable {
        match field {
            PriceField::Close => &self.close,
            PriceField::High => &self.high,
            PriceField::Low => &self.low,
        }
    }

    /// Symbols in column order of the close table, followed by any symbol
    /// only the high or low table knows.
    pub fn symbols(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for field in PriceField::ALL {
            for symbol in self.table(field).symbols() {
                if !out.iter().any(|s| s == symbol) {
                    out.push(symbol.to_string());
                }
            }
        }
        out
    }

    /// Build a symbol's cleaned close/high/low series on the master axis.
    /// A field missing from its table is all absent; a symbol missing from
    /// every table is an error.
    pub fn symbol_prices(
        &self,
        symbol: &str,
        master: &MasterDateAxis,
    ) -> Result<SymbolPrices, IndigridError> {
        let close = self.close.series_on(symbol, master)?;
        let high = self.high.series_on(symbol, master)?;
        let low = self.low.series_on(symbol, master)?;

        if close.is_none() && high.is_none() && low.is_none() {
            return Err(IndigridError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let absent = || vec![None; master.len()];
        Ok(SymbolPrices {
            symbol: symbol.to_string(),
            dates: master.dates().to_vec(),
            close: close.unwrap_or_else(absent),
            high: high.unwrap_or_else(absent),
            low: low.unwrap_or_else(absent),
        })
    }
}

/// One indicator across all symbols: rows are the master dates (ascending),
/// columns are symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

impl IndicatorTable {
    pub fn new(name: &str, master: &MasterDateAxis) -> Self {
        Self {
            name: name.to_string(),
            dates: master.dates().to_vec(),
            columns: Vec::new(),
        }
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.columns.iter().map(|(s, _)| s.as_str()).collect()
    }

    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, v)| v.as_slice())
    }

    pub fn value(&self, date: NaiveDate, symbol: &str) -> Option<f64> {
        let row = self.dates.iter().position(|d| *d == date)?;
        self.column(symbol)?.get(row).copied().flatten()
    }

    /// Insert or replace a symbol's column.
    pub fn set_column(&mut self, symbol: &str, values: Vec<Option<f64>>) {
        match self.columns.iter_mut().find(|(s, _)| s == symbol) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((symbol.to_string(), values)),
        }
    }

    /// Rows for presentation: most recent date first.
    pub fn rows_descending(&self) -> impl Iterator<Item = (NaiveDate, Vec<Option<f64>>)> + '_ {
        (0..self.dates.len()).rev().map(move |row| {
            let values = self
                .columns
                .iter()
                .map(|(_, col)| col.get(row).copied().flatten())
                .collect();
            (self.dates[row], values)
        })
    }
}
