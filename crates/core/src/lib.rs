//! Core types and configuration for the supply-pulse system.
//!
//! This crate provides shared types used across all other crates:
//! - Supply-chain rows (orders, shipments, inventory)
//! - KPI results and chart projections
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
