//! Indicator table sink port trait.

use crate::domain::error::IndigridError;
use crate::domain::table::IndicatorTable;

/// Port for persisting finished indicator tables.
pub trait TablePort {
    fn write_table(&self, table: &IndicatorTable) -> Result<(), IndigridError>;

    /// Default implementation: writes each table in order, stopping at the
    /// first failure.
    fn write_all(&self, tables: &[IndicatorTable]) -> Result<(), IndigridError> {
        tables.iter().try_for_each(|t| self.write_table(t))
    }
}
