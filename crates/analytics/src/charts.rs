//! Chart projections.
//!
//! Small name/value sequences ready for plotting without further grouping.

use chrono::NaiveDate;
use pulse_core::{
    config::{EngineConfig, StatusOrder},
    DailyVolume, LocationStock, Row, StatusSlice,
};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Order counts per status.
///
/// `FirstSeen` keeps the order in which statuses first appear; `CountDesc`
/// sorts by count, ties alphabetically.
pub fn status_distribution(orders: &[&Row], order: StatusOrder) -> Vec<StatusSlice> {
    let mut slices: Vec<StatusSlice> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in orders {
        match index.get(row.status.as_str()) {
            Some(&i) => slices[i].value += 1,
            None => {
                index.insert(row.status.as_str(), slices.len());
                slices.push(StatusSlice {
                    name: row.status.clone(),
                    value: 1,
                });
            }
        }
    }

    if order == StatusOrder::CountDesc {
        slices.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    }

    slices
}

/// Summed inventory quantity per location, in first-seen order.
///
/// Blank locations are reported under the configured unknown label.
pub fn inventory_by_location(inventory: &[&Row], config: &EngineConfig) -> Vec<LocationStock> {
    let mut stocks: Vec<LocationStock> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in inventory {
        let location = if row.location.is_empty() {
            config.unknown_location.as_str()
        } else {
            row.location.as_str()
        };

        match index.get(location) {
            Some(&i) => stocks[i].quantity += row.quantity,
            None => {
                index.insert(location, stocks.len());
                stocks.push(LocationStock {
                    name: location.to_string(),
                    quantity: row.quantity,
                });
            }
        }
    }

    stocks
}

/// Orders per calendar day of `order_date`, ascending. Undated orders are skipped.
pub fn volume_by_day(orders: &[&Row]) -> Vec<DailyVolume> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for date in orders.iter().filter_map(|o| o.order_date) {
        *days.entry(date).or_insert(0) += 1;
    }

    trace!(days = days.len(), "bucketed orders by day");

    days.into_iter()
        .map(|(date, orders)| DailyVolume {
            name: date.format("%Y-%m-%d").to_string(),
            orders,
        })
        .collect()
}
