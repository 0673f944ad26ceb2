//! Generic resource record
//!
//! A [`Resource`] is one JSON object returned by the API. Entity types wrap
//! it and expose typed accessors; the raw mapping is kept so fields this
//! crate does not know about survive a fetch/update cycle.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

/// Timestamp layout Cachet uses in API responses
pub const CACHET_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One entity instance as returned by the API
#[derive(Debug, Clone, Default)]
pub struct Resource {
    attrs: Map<String, Value>,
}

impl Resource {
    pub fn new(attrs: Map<String, Value>) -> Self {
        Self { attrs }
    }

    /// Build from a JSON value; anything that is not an object yields an
    /// empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(attrs) => Self { attrs },
            _ => Self::default(),
        }
    }

    /// Raw field mapping
    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn into_attrs(self) -> Map<String, Value> {
        self.attrs
    }

    /// Raw value of a field; `null` is reported as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key).filter(|v| !v.is_null())
    }

    /// Server-assigned id, or 0 for a record that has none yet
    pub fn id(&self) -> i64 {
        self.get_i64("id").unwrap_or_default()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Boolean field. Cachet sends these as `0`/`1`, `"0"`/`"1"` or real
    /// booleans depending on the endpoint and server version.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(decode_bool)
    }

    /// Timestamp field
    pub fn get_datetime(&self, key: &str) -> Option<NaiveDateTime> {
        self.get_str(key).and_then(parse_datetime)
    }

    /// Stage a raw value. Nothing is sent until the owning manager persists it.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    /// Stage an optional value; `None` stores `null`
    pub fn set_opt<T: Into<Value>>(&mut self, key: &str, value: Option<T>) {
        self.attrs
            .insert(key.to_string(), value.map_or(Value::Null, Into::into));
    }

    /// Stage a boolean using the wire encoding (0/1)
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.attrs.insert(key.to_string(), encode_bool(value));
    }
}

/// Records with ids are equal iff the ids match. Records without an id
/// fall back to comparing every field.
impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        match (self.get_i64("id"), other.get_i64("id")) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.attrs == other.attrs,
            _ => false,
        }
    }
}

impl Eq for Resource {}

/// Wire encoding of a boolean
pub fn encode_bool(value: bool) -> Value {
    Value::from(i64::from(value))
}

/// Decode any of the boolean encodings Cachet emits
pub fn decode_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Some(true),
            "0" | "false" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parse a timestamp in Cachet's `YYYY-MM-DD HH:MM:SS` layout or RFC 3339
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, CACHET_DATETIME_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

/// Format a timestamp the way Cachet accepts it in payloads
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(CACHET_DATETIME_FORMAT).to_string()
}
