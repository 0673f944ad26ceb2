//! Request payload builder
//!
//! Create and update calls only send the fields the caller actually set.
//! [`Payload`] collects fields, drops `None`s and applies the 0/1 boolean
//! wire encoding.

use crate::resource::{encode_bool, format_datetime};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// JSON object sent as a request body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always send `key`
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Send `key` only when a value is present
    pub fn opt<T: Into<Value>>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }

    /// Send a boolean as 0/1
    pub fn flag(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), encode_bool(value));
        self
    }

    pub fn opt_flag(self, key: &str, value: Option<bool>) -> Self {
        match value {
            Some(value) => self.flag(key, value),
            None => self,
        }
    }

    pub fn opt_datetime(self, key: &str, value: Option<&NaiveDateTime>) -> Self {
        self.opt(key, value.map(format_datetime))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(|v| !v.is_null())
    }

    /// Required fields that are absent, in the order given
    pub fn missing(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|key| !self.contains(key))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
