//! KPI calculation.
//!
//! Each metric guards its own denominator: an empty population yields the
//! documented default instead of NaN or an error.

use crate::partition::Partitioned;
use pulse_core::{config::EngineConfig, round_to, CycleTime, KpiResult, Row};
use statrs::statistics::Statistics;
use std::collections::HashSet;

/// KPI calculator.
pub struct KpiCalculator<'c> {
    config: &'c EngineConfig,
}

impl<'c> KpiCalculator<'c> {
    /// Create a new KPI calculator.
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    /// Calculate all four KPIs from partitioned rows.
    pub fn calculate(&self, parts: &Partitioned<'_>) -> KpiResult {
        KpiResult {
            fill_rate: self.fill_rate(&parts.orders),
            cycle_time: self.cycle_time(&parts.orders),
            on_time_rate: self.on_time_rate(&parts.shipments),
            inventory_turnover: self.inventory_turnover(&parts.orders, &parts.inventory),
        }
    }

    /// Shipped-or-delivered orders as a percentage of all orders.
    pub fn fill_rate(&self, orders: &[&Row]) -> f64 {
        if orders.is_empty() {
            return 0.0;
        }
        let fulfilled = orders
            .iter()
            .filter(|o| self.config.is_fulfilled(&o.status))
            .count();
        fulfilled as f64 / orders.len() as f64 * 100.0
    }

    /// Mean days from order to delivery over delivered orders with both dates.
    pub fn cycle_time(&self, orders: &[&Row]) -> CycleTime {
        let days: Vec<f64> = orders
            .iter()
            .filter(|o| o.status == self.config.delivered_status)
            .filter_map(|o| match (o.order_date, o.delivery_date) {
                (Some(ordered), Some(delivered)) => {
                    Some((delivered - ordered).num_days() as f64)
                }
                _ => None,
            })
            .collect();

        if days.is_empty() {
            return CycleTime::NotApplicable;
        }
        CycleTime::Days(round_to(days.mean(), self.config.cycle_time_decimals))
    }

    /// On-time shipments as a percentage of shipments that have a required date.
    ///
    /// Shipments without a required date count toward neither side.
    pub fn on_time_rate(&self, shipments: &[&Row]) -> f64 {
        let mut with_deadline = 0usize;
        let mut on_time = 0usize;

        for shipment in shipments {
            let Some(required) = shipment.required_shipping_date else {
                continue;
            };
            with_deadline += 1;
            if shipment.ship_date.is_some_and(|shipped| shipped <= required) {
                on_time += 1;
            }
        }

        if with_deadline == 0 {
            0.0
        } else {
            on_time as f64 / with_deadline as f64 * 100.0
        }
    }

    /// Fulfilled order quantity over estimated average inventory.
    ///
    /// Average inventory is total stock divided by rows-per-product, which
    /// reduces to total stock when every product has one row.
    pub fn inventory_turnover(&self, orders: &[&Row], inventory: &[&Row]) -> f64 {
        let shipped_quantity: f64 = orders
            .iter()
            .filter(|o| self.config.is_fulfilled(&o.status))
            .map(|o| o.quantity)
            .sum();

        let total_inventory: f64 = inventory.iter().map(|i| i.quantity).sum();
        let distinct_products = inventory
            .iter()
            .map(|i| i.product_name.as_str())
            .collect::<HashSet<_>>()
            .len();

        let rows_per_product = if distinct_products == 0 {
            0.0
        } else {
            inventory.len() as f64 / distinct_products as f64
        };
        let rows_per_product = if rows_per_product == 0.0 { 1.0 } else { rows_per_product };

        let average_inventory = total_inventory / rows_per_product;
        if average_inventory <= 0.0 || !average_inventory.is_finite() {
            return 0.0;
        }

        let turnover = shipped_quantity / average_inventory;
        if turnover.is_finite() {
            turnover.max(0.0)
        } else {
            0.0
        }
    }
}
