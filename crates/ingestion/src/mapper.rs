//! Row mapping from loosely typed records.
//!
//! Uploaded sheets arrive as JSON objects with arbitrary column names and
//! cell types. The mapper pulls out the fixed supply-chain fields, coerces
//! quantities to numbers, normalizes dates, and keeps every other column
//! verbatim.

use crate::date::parse_date;
use chrono::NaiveDate;
use pulse_core::{config::IngestionConfig, Error, RecordType, Result, Row};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Column names the mapper consumes; all others are passthrough.
const FIXED_FIELDS: &[&str] = &[
    "type",
    "id",
    "product_name",
    "quantity",
    "status",
    "order_date",
    "ship_date",
    "delivery_date",
    "required_shipping_date",
    "location",
];

/// Statistics about a mapping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingStats {
    /// Rows mapped.
    pub rows: u64,
    /// Non-blank date cells that could not be read.
    pub unparsed_dates: u64,
    /// Quantity cells present but not numeric (mapped to 0).
    pub coerced_quantities: u64,
    /// Passthrough cells kept in `extra`.
    pub passthrough_fields: u64,
}

/// Maps loose records to typed rows.
#[derive(Debug, Clone, Default)]
pub struct RowMapper {
    config: IngestionConfig,
}

impl RowMapper {
    /// Create a new row mapper.
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    /// Map a single value, which must be a JSON object.
    pub fn map_value(&self, value: &Value) -> Result<Row> {
        let record = value
            .as_object()
            .ok_or_else(|| Error::data(format!("expected a record object, got {}", kind(value))))?;
        Ok(self.map_record(record))
    }

    /// Map a single record. Never fails; odd cells degrade to defaults.
    pub fn map_record(&self, record: &Map<String, Value>) -> Row {
        self.map_counted(record, &mut MappingStats::default())
    }

    /// Map every value in order.
    pub fn map_all(&self, values: &[Value]) -> Result<Vec<Row>> {
        self.map_all_with_stats(values).map(|(rows, _)| rows)
    }

    /// Map every value in order, also returning mapping statistics.
    ///
    /// Stops at the first value that is not an object.
    pub fn map_all_with_stats(&self, values: &[Value]) -> Result<(Vec<Row>, MappingStats)> {
        let mut stats = MappingStats::default();
        let mut rows = Vec::with_capacity(values.len());

        for (index, value) in values.iter().enumerate() {
            let record = value.as_object().ok_or_else(|| {
                Error::data(format!(
                    "row {index}: expected a record object, got {}",
                    kind(value)
                ))
            })?;
            rows.push(self.map_counted(record, &mut stats));
        }

        debug!(
            rows = stats.rows,
            unparsed_dates = stats.unparsed_dates,
            coerced_quantities = stats.coerced_quantities,
            passthrough_fields = stats.passthrough_fields,
            "mapped rows"
        );

        Ok((rows, stats))
    }

    fn map_counted(&self, record: &Map<String, Value>, stats: &mut MappingStats) -> Row {
        // Normalized headers only select fixed fields; passthrough columns keep
        // their source key. On collision the first non-blank cell wins.
        let mut fields: BTreeMap<&'static str, &Value> = BTreeMap::new();
        let mut extra: BTreeMap<String, Value> = BTreeMap::new();
        for (key, value) in record {
            let column = self.column_name(key);
            match FIXED_FIELDS.iter().find(|field| **field == column) {
                Some(&field) => {
                    let slot = fields.entry(field).or_insert(value);
                    if is_blank(*slot) && !is_blank(value) {
                        *slot = value;
                    }
                }
                None => {
                    extra.insert(key.clone(), value.clone());
                }
            }
        }
        let get = |name: &str| fields.get(name).copied();

        let type_text = text(get("type")).to_lowercase();
        let record_type = if type_text.is_empty() {
            RecordType::from(self.config.default_record_type.trim().to_lowercase())
        } else {
            RecordType::from(type_text)
        };

        let quantity = match get("quantity") {
            None | Some(Value::Null) => 0.0,
            Some(value) => coerce_quantity(value).unwrap_or_else(|| {
                stats.coerced_quantities += 1;
                0.0
            }),
        };

        let mut date = |name: &str| -> Option<NaiveDate> {
            let value = get(name)?;
            let parsed = parse_date(value);
            if parsed.is_none() && !is_blank(value) {
                stats.unparsed_dates += 1;
            }
            parsed
        };
        let order_date = date("order_date");
        let ship_date = date("ship_date");
        let delivery_date = date("delivery_date");
        let required_shipping_date = date("required_shipping_date");

        stats.passthrough_fields += extra.len() as u64;
        stats.rows += 1;

        Row {
            record_type,
            id: text(get("id")),
            product_name: text(get("product_name")),
            quantity,
            status: text(get("status")),
            order_date,
            ship_date,
            delivery_date,
            required_shipping_date,
            location: text(get("location")),
            extra,
        }
    }

    fn column_name(&self, key: &str) -> String {
        if self.config.normalize_headers {
            normalize_header(key)
        } else {
            key.to_string()
        }
    }
}

/// `" Product Name "` -> `product_name`.
fn normalize_header(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut pending_sep = false;

    for ch in key.trim().chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_sep = true;
        } else {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        }
    }

    out
}

/// Text content of a cell; scalars are rendered, everything else is empty.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_quantity(value: &Value) -> Option<f64> {
    let quantity = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    quantity.is_finite().then_some(quantity)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
