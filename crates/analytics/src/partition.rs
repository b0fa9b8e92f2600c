//! Partitioning rows by record type.

use pulse_core::{RecordType, Row};

/// Borrowed view of the input split by record type.
///
/// Rows of any other type belong to no partition.
#[derive(Debug, Default)]
pub struct Partitioned<'a> {
    pub orders: Vec<&'a Row>,
    pub shipments: Vec<&'a Row>,
    pub inventory: Vec<&'a Row>,
}

impl<'a> Partitioned<'a> {
    /// Split rows in a single pass, preserving input order.
    pub fn from_rows(rows: &'a [Row]) -> Self {
        let mut parts = Self::default();
        for row in rows {
            match row.record_type {
                RecordType::Order => parts.orders.push(row),
                RecordType::Shipment => parts.shipments.push(row),
                RecordType::Inventory => parts.inventory.push(row),
                RecordType::Other(_) => {}
            }
        }
        parts
    }

    /// Number of rows that landed in a partition.
    pub fn len(&self) -> usize {
        self.orders.len() + self.shipments.len() + self.inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
