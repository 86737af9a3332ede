//! State records: one row of host state, as the renderer sees it.
//!
//! A [`StateRecord`] is a flat map of field name to [`FieldValue`]. Reports
//! build records from the snapshot; the filter and table stages only ever see
//! records, never the snapshot types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format used when a timestamp is shown in a table cell.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    /// Compare two values for sorting. Numbers and timestamps compare by
    /// value, everything else by displayed text.
    pub fn compare(&self, other: &FieldValue) -> std::cmp::Ordering {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// One row of host state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl StateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a field.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Builder: set a field only when a value is present.
    pub fn with_opt<V: Into<FieldValue>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(field, v),
            None => self,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Display text of a field, if present.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).map(|v| v.to_string())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_and_lookup() {
        let record = StateRecord::new()
            .with("tep_address", "10.0.0.4")
            .with("egress_label", 103u32)
            .with_opt::<u64>("num_macs", None);

        assert_eq!(record.len(), 2);
        assert_eq!(record.text("tep_address").as_deref(), Some("10.0.0.4"));
        assert_eq!(record.get("egress_label"), Some(&FieldValue::Int(103)));
        assert!(record.get("num_macs").is_none());
    }

    #[test]
    fn test_timestamp_display() {
        let ts = Utc.with_ymd_and_hms(2025, 4, 2, 8, 48, 34).unwrap();
        assert_eq!(FieldValue::from(ts).to_string(), "2025-04-02 08:48:34");
    }

    #[test]
    fn test_compare_numbers_numerically() {
        let a = FieldValue::Int(9);
        let b = FieldValue::Int(10);
        assert_eq!(a.compare(&b), std::cmp::Ordering::Less);
        // As text "9" > "10"
        let a = FieldValue::from("9");
        let b = FieldValue::from("10");
        assert_eq!(a.compare(&b), std::cmp::Ordering::Greater);
    }

    #[test]
    fn test_u64_saturates() {
        assert_eq!(FieldValue::from(u64::MAX), FieldValue::Int(i64::MAX));
    }

    #[test]
    fn test_record_json_shape() {
        let record = StateRecord::new().with("name", "ethernet-1/1").with("mtu", 9232u32);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "ethernet-1/1");
        assert_eq!(json["mtu"], 9232);
    }
}
