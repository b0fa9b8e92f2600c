//! KPI aggregation for the supply-pulse system.
//!
//! This crate handles:
//! - Partitioning rows into orders, shipments and inventory
//! - Fill rate, cycle time, on-time rate and inventory turnover
//! - Status, location and daily-volume chart projections

pub mod partition;
pub mod kpi;
pub mod charts;
pub mod engine;

#[cfg(test)]
mod logging;

pub use partition::Partitioned;
pub use kpi::KpiCalculator;
pub use engine::{aggregate, AggregationEngine};
