//! Tabular record access.
//!
//! The aggregator never looks at records directly; it asks a [`RecordSource`] for the values a
//! record holds under a named dimension. A lookup may yield zero, one or many values and only
//! "exactly one value of the expected type" is accepted by the extraction helpers.

use serde_json::Value;

/// A tabular data source addressed by record index and dimension name.
pub trait RecordSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every value stored under `dimension` for the record at `index`.
    fn record_values(&self, index: usize, dimension: &str) -> Vec<Value>;
}

/// Records backed by a JSON array of objects.
///
/// Dimensions are dotted paths (`"place.lat"`). Arrays met while walking a path fan out, so
/// `"tags.name"` over `{"tags": [{"name": "a"}, {"name": "b"}]}` yields two values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRecords {
    records: Vec<Value>,
}

impl JsonRecords {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    /// Accepts either a top-level array of records or a single object (one record).
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(records) => Self::new(records),
            Value::Null => Self::default(),
            other => Self::new(vec![other]),
        }
    }

    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }
}

impl RecordSource for JsonRecords {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn record_values(&self, index: usize, dimension: &str) -> Vec<Value> {
        let Some(record) = self.records.get(index) else {
            return Vec::new();
        };
        if dimension.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        let segments: Vec<&str> = dimension.split('.').collect();
        collect_path(record, &segments, &mut out);
        out
    }
}

fn collect_path(cur: &Value, segments: &[&str], out: &mut Vec<Value>) {
    if let Value::Array(items) = cur {
        for item in items {
            collect_path(item, segments, out);
        }
        return;
    }

    let Some((head, rest)) = segments.split_first() else {
        if !cur.is_null() {
            out.push(cur.clone());
        }
        return;
    };

    if let Some(next) = cur.as_object().and_then(|obj| obj.get(*head)) {
        collect_path(next, rest, out);
    }
}

/// Exactly one finite JSON number.
pub fn single_number(values: &[Value]) -> Option<f64> {
    match values {
        [value] => value.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Exactly one JSON string.
pub fn single_string(values: &[Value]) -> Option<&str> {
    match values {
        [value] => value.as_str(),
        _ => None,
    }
}
