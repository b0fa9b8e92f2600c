//! Data ingestion and normalization for the supply-pulse system.
//!
//! This crate handles:
//! - Date normalization (loose text to UTC calendar dates)
//! - Row mapping (loose records to typed rows)
//! - Quantity coercion and passthrough column capture

pub mod date;
pub mod mapper;

pub use date::{parse_date, parse_date_str};
pub use mapper::{MappingStats, RowMapper};
