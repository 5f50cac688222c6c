//! Port traits at the I/O seams of the indicator engine.

pub mod config_port;
pub mod price_port;
pub mod table_port;
