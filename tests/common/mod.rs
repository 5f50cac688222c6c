#![allow(dead_code)]

use chrono::NaiveDate;
use indigrid::domain::align::FillPolicy;
use indigrid::domain::config_validation::RunConfig;
use indigrid::domain::error::IndigridError;
use indigrid::domain::indicator::IndicatorDefinition;
use indigrid::domain::series::PriceField;
use indigrid::domain::table::{IndicatorTable, PriceTable};
use indigrid::ports::price_port::PricePort;
use indigrid::ports::table_port::TablePort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `n` consecutive calendar days starting 2024-01-01.
pub fn days(n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| date(2024, 1, 1) + chrono::Days::new(i as u64))
        .collect()
}

pub fn make_table(name: &str, dates: &[NaiveDate], columns: &[(&str, Vec<String>)]) -> PriceTable {
    PriceTable {
        name: name.to_string(),
        dates: dates.to_vec(),
        columns: columns
            .iter()
            .map(|(s, cells)| (s.to_string(), cells.clone()))
            .collect(),
    }
}

/// Cells for a numeric series; `None` becomes an empty cell.
pub fn cells(values: &[Option<f64>]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.map(|x| x.to_string()).unwrap_or_default())
        .collect()
}

pub fn ramp(n: usize, start: f64, step: f64) -> Vec<Option<f64>> {
    (0..n).map(|i| Some(start + step * i as f64)).collect()
}

pub struct MockPricePort {
    pub tables: HashMap<PriceField, PriceTable>,
    pub errors: HashMap<PriceField, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_table(mut self, field: PriceField, table: PriceTable) -> Self {
        self.tables.insert(field, table);
        self
    }

    pub fn with_error(mut self, field: PriceField, reason: &str) -> Self {
        self.errors.insert(field, reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn load_table(&self, field: PriceField) -> Result<PriceTable, IndigridError> {
        if let Some(reason) = self.errors.get(&field) {
            return Err(IndigridError::Csv {
                reason: reason.clone(),
            });
        }
        Ok(self.tables.get(&field).cloned().unwrap_or_else(|| PriceTable {
            name: field.as_str().to_string(),
            ..Default::default()
        }))
    }
}

/// Keeps every written table in memory.
pub struct RecordingTablePort {
    pub written: RefCell<Vec<IndicatorTable>>,
}

impl RecordingTablePort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }

    pub fn table(&self, name: &str) -> Option<IndicatorTable> {
        self.written.borrow().iter().find(|t| t.name == name).cloned()
    }
}

impl TablePort for RecordingTablePort {
    fn write_table(&self, table: &IndicatorTable) -> Result<(), IndigridError> {
        self.written.borrow_mut().push(table.clone());
        Ok(())
    }
}

pub fn run_config() -> RunConfig {
    RunConfig {
        close_path: PathBuf::from("close.csv"),
        high_path: PathBuf::from("high.csv"),
        low_path: PathBuf::from("low.csv"),
        definitions_path: PathBuf::from("indicators.json"),
        output_dir: PathBuf::from("out"),
        symbols: None,
        max_dates: None,
        default_fill: FillPolicy::LeaveGaps,
    }
}

pub fn definitions(json: &str) -> Vec<IndicatorDefinition> {
    indigrid::adapters::definitions_adapter::parse_definitions(json).unwrap()
}
