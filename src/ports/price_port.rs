//! Price table source port trait.

use crate::domain::error::IndigridError;
use crate::domain::series::PriceField;
use crate::domain::table::{PriceTable, PriceTables};

pub trait PricePort {
    fn load_table(&self, field: PriceField) -> Result<PriceTable, IndigridError>;

    /// Default implementation: loads the close, high and low tables in turn.
    fn load_all(&self) -> Result<PriceTables, IndigridError> {
        Ok(PriceTables {
            close: self.load_table(PriceField::Close)?,
            high: self.load_table(PriceField::High)?,
            low: self.load_table(PriceField::Low)?,
        })
    }
}
