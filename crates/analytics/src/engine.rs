//! Aggregation engine.
//!
//! Combines partitioning, KPI calculation and chart projections into a single
//! pass over a materialized row collection.

use crate::{
    charts::{inventory_by_location, status_distribution, volume_by_day},
    kpi::KpiCalculator,
    partition::Partitioned,
};
use pulse_core::{config::EngineConfig, AggregateReport, Config, Row};
use tracing::debug;

/// Aggregation engine.
///
/// Holds only configuration; every call computes a fresh report and keeps no
/// reference to its input.
#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    config: EngineConfig,
}

impl AggregationEngine {
    /// Create a new engine from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_engine_config(config.engine.clone())
    }

    pub fn with_engine_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute KPIs, chart projections, and the order subset.
    pub fn aggregate(&self, rows: &[Row]) -> AggregateReport {
        let parts = Partitioned::from_rows(rows);
        debug!(
            rows = rows.len(),
            orders = parts.orders.len(),
            shipments = parts.shipments.len(),
            inventory = parts.inventory.len(),
            ignored = rows.len() - parts.len(),
            "partitioned rows"
        );

        let kpis = KpiCalculator::new(&self.config).calculate(&parts);
        debug!(
            fill_rate = kpis.fill_rate,
            cycle_time = %kpis.cycle_time,
            on_time_rate = kpis.on_time_rate,
            inventory_turnover = kpis.inventory_turnover,
            "computed kpis"
        );

        AggregateReport {
            kpis,
            status_chart: status_distribution(&parts.orders, self.config.status_order),
            location_chart: inventory_by_location(&parts.inventory, &self.config),
            volume_chart: volume_by_day(&parts.orders),
            orders: parts.orders.iter().map(|&o| o.clone()).collect(),
        }
    }
}

/// Aggregate with the default configuration.
pub fn aggregate(rows: &[Row]) -> AggregateReport {
    AggregationEngine::default().aggregate(rows)
}
