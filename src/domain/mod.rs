//! Core domain types and logic.

pub mod align;
pub mod calendar;
pub mod config_validation;
pub mod dispatch;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod numeric;
pub mod series;
pub mod table;
pub mod tabulate;
pub mod universe;
