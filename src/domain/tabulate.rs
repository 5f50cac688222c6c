//! Per-indicator tabulation across symbols.
//!
//! Each symbol is processed independently into aligned columns
//! ([`process_symbol`]); a [`TableBuilder`] owned by the caller absorbs those
//! return values into one [`IndicatorTable`] per output name.

use crate::domain::align::{FillPolicy, align_to_master};
use crate::domain::calendar::MasterDateAxis;
use crate::domain::dispatch::compute_indicators;
use crate::domain::error::IndigridError;
use crate::domain::indicator::IndicatorDefinition;
use crate::domain::table::{IndicatorTable, PriceTables};
use tracing::{debug, warn};

/// Aligned indicator columns of one symbol, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolColumns {
    pub symbol: String,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tabulation {
    pub tables: Vec<IndicatorTable>,
    pub processed: Vec<String>,
    pub skipped: Vec<SkippedSymbol>,
}

impl Tabulation {
    pub fn table(&self, name: &str) -> Option<&IndicatorTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Build one symbol's price series, run every definition and align each
/// output onto the master axis.
pub fn process_symbol(
    symbol: &str,
    prices: &PriceTables,
    master: &MasterDateAxis,
    definitions: &[IndicatorDefinition],
    default_fill: FillPolicy,
) -> Result<SymbolColumns, IndigridError> {
    let symbol_prices = prices.symbol_prices(symbol, master)?;
    let outputs = compute_indicators(&symbol_prices, definitions);

    let columns = outputs
        .into_iter()
        .map(|named| {
            let policy = named.fill.unwrap_or(default_fill);
            (named.name, align_to_master(&named.series, master, policy))
        })
        .collect();

    Ok(SymbolColumns {
        symbol: symbol.to_string(),
        columns,
    })
}

/// Accumulates per-symbol columns into per-output tables.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    master: MasterDateAxis,
    tables: Vec<IndicatorTable>,
}

impl TableBuilder {
    pub fn new(master: MasterDateAxis) -> Self {
        Self {
            master,
            tables: Vec::new(),
        }
    }

    pub fn absorb(&mut self, columns: SymbolColumns) {
        for (name, values) in columns.columns {
            let index = match self.tables.iter().position(|t| t.name == name) {
                Some(i) => i,
                None => {
                    self.tables.push(IndicatorTable::new(&name, &self.master));
                    self.tables.len() - 1
                }
            };
            self.tables[index].set_column(&columns.symbol, values);
        }
    }

    /// Tables in order of first appearance of their output name.
    pub fn finish(self) -> Vec<IndicatorTable> {
        self.tables
    }
}

/// Run every symbol through the dispatcher and aligner. A symbol that fails
/// while its series are built is skipped and left out of every table.
pub fn tabulate(
    prices: &PriceTables,
    master: &MasterDateAxis,
    symbols: &[String],
    definitions: &[IndicatorDefinition],
    default_fill: FillPolicy,
) -> Tabulation {
    let mut builder = TableBuilder::new(master.clone());
    let mut processed = Vec::with_capacity(symbols.len());
    let mut skipped = Vec::new();

    for symbol in symbols {
        match process_symbol(symbol, prices, master, definitions, default_fill) {
            Ok(columns) => {
                debug!(symbol = %symbol, outputs = columns.columns.len(), "symbol processed");
                builder.absorb(columns);
                processed.push(symbol.clone());
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "skipping symbol");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Tabulation {
        tables: builder.finish(),
        processed,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{EmaParams, IndicatorSpec, OutputNames};
    use crate::domain::table::PriceTable;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
    }

    fn close_table(days: &[u32], columns: Vec<(&str, Vec<&str>)>) -> PriceTable {
        PriceTable {
            name: "close".into(),
            dates: days.iter().map(|day| d(*day)).collect(),
            columns: columns
                .into_iter()
                .map(|(s, cells)| (s.to_string(), cells.into_iter().map(String::from).collect()))
                .collect(),
        }
    }

    fn ema(length: usize, name: &str, fill: Option<FillPolicy>) -> IndicatorDefinition {
        IndicatorDefinition {
            spec: IndicatorSpec::Ema(EmaParams { length }),
            output: OutputNames::Single(name.into()),
            fill,
        }
    }

    #[test]
    fn builds_one_table_per_output() {
        let prices = PriceTables {
            close: close_table(
                &[1, 2, 3],
                vec![("AAA", vec!["1", "2", "3"]), ("BBB", vec!["", "4", "6"])],
            ),
            ..Default::default()
        };
        let master = MasterDateAxis::new(prices.close.dates.clone());
        let defs = vec![ema(1, "E1", None), ema(2, "E2", None)];
        let symbols = vec!["AAA".to_string(), "BBB".to_string()];

        let result = tabulate(&prices, &master, &symbols, &defs, FillPolicy::LeaveGaps);

        assert_eq!(result.tables.len(), 2);
        let e2 = result.table("E2").unwrap();
        assert_eq!(e2.symbols(), vec!["AAA", "BBB"]);
        assert_eq!(e2.column("AAA").unwrap(), &[None, Some(1.5), Some(2.5)]);
        assert_eq!(e2.column("BBB").unwrap(), &[None, None, Some(5.0)]);
        assert_eq!(result.processed, symbols);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn unknown_symbol_is_skipped() {
        let prices = PriceTables {
            close: close_table(&[1, 2], vec![("AAA", vec!["1", "2"])]),
            ..Default::default()
        };
        let master = MasterDateAxis::new(prices.close.dates.clone());
        let symbols = vec!["ZZZ".to_string(), "AAA".to_string()];

        let result = tabulate(&prices, &master, &symbols, &[ema(1, "E", None)], FillPolicy::LeaveGaps);

        assert_eq!(result.processed, vec!["AAA".to_string()]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].symbol, "ZZZ");
        assert_eq!(result.table("E").unwrap().symbols(), vec!["AAA"]);
    }

    #[test]
    fn per_definition_fill_overrides_default() {
        let prices = PriceTables {
            close: close_table(&[1, 2, 3], vec![("AAA", vec!["1", "", "3"])]),
            ..Default::default()
        };
        let master = MasterDateAxis::new(prices.close.dates.clone());
        let defs = vec![
            ema(1, "GAPS", None),
            ema(1, "FILLED", Some(FillPolicy::ForwardFill)),
        ];
        let result = tabulate(
            &prices,
            &master,
            &["AAA".to_string()],
            &defs,
            FillPolicy::LeaveGaps,
        );

        assert_eq!(
            result.table("GAPS").unwrap().column("AAA").unwrap(),
            &[Some(1.0), None, Some(3.0)]
        );
        assert_eq!(
            result.table("FILLED").unwrap().column("AAA").unwrap(),
            &[Some(1.0), Some(1.0), Some(3.0)]
        );
    }

    #[test]
    fn builder_orders_tables_by_first_appearance() {
        let master = MasterDateAxis::new(vec![d(1)]);
        let mut builder = TableBuilder::new(master);
        builder.absorb(SymbolColumns {
            symbol: "AAA".into(),
            columns: vec![("B".into(), vec![Some(1.0)]), ("A".into(), vec![None])],
        });
        builder.absorb(SymbolColumns {
            symbol: "BBB".into(),
            columns: vec![("A".into(), vec![Some(2.0)]), ("B".into(), vec![Some(3.0)])],
        });
        let tables = builder.finish();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(tables[1].column("BBB").unwrap(), &[Some(2.0)]);
    }
}
