//! Wide CSV price tables in, per-indicator CSV tables out.
//!
//! Input files carry a date in the first column and one column per symbol.
//! Output files mirror that shape, newest date first.

use crate::domain::calendar::{format_date, parse_date};
use crate::domain::error::IndigridError;
use crate::domain::series::PriceField;
use crate::domain::table::{IndicatorTable, PriceTable};
use crate::ports::price_port::PricePort;
use crate::ports::table_port::TablePort;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DATE_HEADER: &str = "Tarih";

pub struct CsvPriceAdapter {
    close_path: PathBuf,
    high_path: PathBuf,
    low_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(close_path: PathBuf, high_path: PathBuf, low_path: PathBuf) -> Self {
        Self {
            close_path,
            high_path,
            low_path,
        }
    }

    fn path(&self, field: PriceField) -> &Path {
        match field {
            PriceField::Close => &self.close_path,
            PriceField::High => &self.high_path,
            PriceField::Low => &self.low_path,
        }
    }
}

impl PricePort for CsvPriceAdapter {
    fn load_table(&self, field: PriceField) -> Result<PriceTable, IndigridError> {
        let path = self.path(field);
        let file = fs::File::open(path).map_err(|e| {
            IndigridError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", path.display(), e),
            ))
        })?;
        let table = read_price_table(field.as_str(), file)?;
        debug!(
            table = field.as_str(),
            path = %path.display(),
            rows = table.dates.len(),
            symbols = table.columns.len(),
            "price table loaded"
        );
        Ok(table)
    }
}

/// Parse one wide price table. Symbol headers are trimmed, case is kept.
/// A row shorter than the header leaves the trailing columns ragged, which
/// the symbol extraction reports per symbol.
pub fn read_price_table<R: Read>(name: &str, reader: R) -> Result<PriceTable, IndigridError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        return Err(IndigridError::MalformedTable {
            table: name.to_string(),
            reason: "expected a date column followed by symbol columns".into(),
        });
    }

    let mut columns: Vec<(String, Vec<String>)> = headers
        .iter()
        .skip(1)
        .map(|h| (h.to_string(), Vec::new()))
        .collect();
    let mut dates = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let date_cell = record.get(0).unwrap_or_default();
        if date_cell.trim().is_empty() && record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        dates.push(parse_date(date_cell)?);

        for (k, (_, cells)) in columns.iter_mut().enumerate() {
            if let Some(cell) = record.get(k + 1) {
                cells.push(cell.to_string());
            }
        }
    }

    Ok(PriceTable {
        name: name.to_string(),
        dates,
        columns,
    })
}

pub struct CsvTableWriter {
    directory: PathBuf,
}

impl CsvTableWriter {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn table_path(&self, table: &IndicatorTable) -> PathBuf {
        self.directory.join(format!("{}.csv", table.name))
    }
}

impl TablePort for CsvTableWriter {
    fn write_table(&self, table: &IndicatorTable) -> Result<(), IndigridError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.table_path(table);
        let file = fs::File::create(&path)?;
        write_indicator_table(table, file)?;
        info!(table = %table.name, path = %path.display(), "table written");
        Ok(())
    }
}

/// Write `table` as CSV: `Tarih` then one column per symbol, newest row
/// first, two decimals, empty cell for absent values.
pub fn write_indicator_table<W: Write>(
    table: &IndicatorTable,
    writer: W,
) -> Result<(), IndigridError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![DATE_HEADER.to_string()];
    header.extend(table.symbols().into_iter().map(String::from));
    wtr.write_record(&header)?;

    for (date, values) in table.rows_descending() {
        let mut row = Vec::with_capacity(values.len() + 1);
        row.push(format_date(date));
        row.extend(values.iter().map(|v| match v {
            Some(x) => format!("{x:.2}"),
            None => String::new(),
        }));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
