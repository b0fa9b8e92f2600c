//! Core data types for the supply-pulse system.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Label used when a cycle time cannot be computed.
pub const NOT_APPLICABLE: &str = "N/A";

/// Decimals beyond this are below f64 resolution for day and percent values.
pub const MAX_ROUND_DECIMALS: u32 = 15;

/// Round half away from zero to a fixed number of decimals.
///
/// `decimals` is capped at [`MAX_ROUND_DECIMALS`]; a value too large to scale
/// is returned unchanged.
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_ROUND_DECIMALS) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Record type discriminant of a row.
///
/// Unknown strings are kept as `Other` so the original value survives a round
/// trip; such rows take part in no partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    Order,
    Shipment,
    Inventory,
    Other(String),
}

impl RecordType {
    /// The wire value of this type.
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Order => "order",
            RecordType::Shipment => "shipment",
            RecordType::Inventory => "inventory",
            RecordType::Other(s) => s,
        }
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "order" => RecordType::Order,
            "shipment" => RecordType::Shipment,
            "inventory" => RecordType::Inventory,
            _ => RecordType::Other(s),
        }
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        RecordType::from(s.to_string())
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        match t {
            RecordType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized supply-chain record.
///
/// Dates are UTC calendar dates; `None` means the source value was missing or
/// unparseable. Columns outside the fixed set are carried verbatim in `extra`
/// and never read by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Record type discriminant.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub product_name: String,
    /// Always numeric; non-numeric source values are coerced to 0 on ingestion.
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub ship_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub required_shipping_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: String,
    /// Passthrough columns.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Row {
    /// Create an empty row of the given type.
    pub fn new(record_type: impl Into<RecordType>) -> Self {
        Self {
            record_type: record_type.into(),
            id: String::new(),
            product_name: String::new(),
            quantity: 0.0,
            status: String::new(),
            order_date: None,
            ship_date: None,
            delivery_date: None,
            required_shipping_date: None,
            location: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// Mean order-to-delivery time, or the "not applicable" sentinel.
///
/// Serializes as a number of days or the string `"N/A"`. The sentinel is
/// distinct from a genuine zero-day cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CycleTimeRepr", into = "CycleTimeRepr")]
pub enum CycleTime {
    Days(f64),
    NotApplicable,
}

impl CycleTime {
    /// Days, if applicable.
    pub fn days(self) -> Option<f64> {
        match self {
            CycleTime::Days(d) => Some(d),
            CycleTime::NotApplicable => None,
        }
    }

    pub fn is_applicable(self) -> bool {
        matches!(self, CycleTime::Days(_))
    }
}

impl fmt::Display for CycleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleTime::Days(d) => write!(f, "{:.1}", d),
            CycleTime::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CycleTimeRepr {
    Days(f64),
    Label(String),
}

impl From<CycleTime> for CycleTimeRepr {
    fn from(c: CycleTime) -> Self {
        match c {
            CycleTime::Days(d) => CycleTimeRepr::Days(d),
            CycleTime::NotApplicable => CycleTimeRepr::Label(NOT_APPLICABLE.to_string()),
        }
    }
}

impl TryFrom<CycleTimeRepr> for CycleTime {
    type Error = String;

    fn try_from(repr: CycleTimeRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            CycleTimeRepr::Days(d) => Ok(CycleTime::Days(d)),
            CycleTimeRepr::Label(s) if s == NOT_APPLICABLE => Ok(CycleTime::NotApplicable),
            CycleTimeRepr::Label(s) => Err(format!("invalid cycle time label: {s}")),
        }
    }
}

/// The four operational KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResult {
    /// Percentage of orders shipped or delivered (0-100).
    pub fill_rate: f64,
    /// Mean order-to-delivery days.
    pub cycle_time: CycleTime,
    /// Percentage of shipments dispatched on or before the required date (0-100).
    pub on_time_rate: f64,
    /// Quantity shipped over estimated average inventory (>= 0).
    pub inventory_turnover: f64,
}

impl KpiResult {
    /// Copy with every numeric value rounded for display.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            fill_rate: round_to(self.fill_rate, decimals),
            cycle_time: match self.cycle_time {
                CycleTime::Days(d) => CycleTime::Days(round_to(d, decimals)),
                CycleTime::NotApplicable => CycleTime::NotApplicable,
            },
            on_time_rate: round_to(self.on_time_rate, decimals),
            inventory_turnover: round_to(self.inventory_turnover, decimals),
        }
    }
}

/// Order count for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSlice {
    pub name: String,
    pub value: u64,
}

/// Summed inventory quantity for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStock {
    pub name: String,
    pub quantity: f64,
}

/// Order count for one calendar day; `name` is `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub name: String,
    pub orders: u64,
}

/// Everything one aggregation pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub kpis: KpiResult,
    pub status_chart: Vec<StatusSlice>,
    pub location_chart: Vec<LocationStock>,
    pub volume_chart: Vec<DailyVolume>,
    /// Every order row, unfiltered, for downstream drill-down.
    pub orders: Vec<Row>,
}
