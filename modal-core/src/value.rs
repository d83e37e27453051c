//! Untyped option values.
//!
//! Hosts that hand over loosely typed configuration (a JavaScript object,
//! a JSON document) describe it as an [`OptionValue`] tree. Resolution into
//! the typed option structs happens once, in [`crate::options`].

use serde_json::Value;

/// A loosely typed option value, generic over the host's callable type.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue<F> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<OptionValue<F>>),
    /// Key/value pairs in insertion order.
    Object(Vec<(String, OptionValue<F>)>),
    Function(F),
}

impl<F> Default for OptionValue<F> {
    fn default() -> Self {
        OptionValue::Undefined
    }
}

impl<F> OptionValue<F> {
    /// An empty object, the usual starting point for building options by hand.
    pub fn object() -> Self {
        OptionValue::Object(Vec::new())
    }

    /// Adds or replaces `key` on an object. Has no effect on other variants.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue<F>>) -> Self {
        if let OptionValue::Object(entries) = &mut self {
            let key = key.into();
            let value = value.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        self
    }

    /// Looks up `key` on an object. Missing keys and non-objects yield `None`.
    pub fn get(&self, key: &str) -> Option<&OptionValue<F>> {
        match self {
            OptionValue::Object(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v)
                .filter(|v| !v.is_absent()),
            _ => None,
        }
    }

    /// `undefined` and `null` both mean "not supplied".
    pub fn is_absent(&self) -> bool {
        matches!(self, OptionValue::Undefined | OptionValue::Null)
    }

    /// The host-language `typeof` name, reported in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Undefined => "undefined",
            OptionValue::Null | OptionValue::Array(_) | OptionValue::Object(_) => "object",
            OptionValue::Bool(_) => "boolean",
            OptionValue::Number(_) => "number",
            OptionValue::String(_) => "string",
            OptionValue::Function(_) => "function",
        }
    }
}

impl<F> From<Value> for OptionValue<F> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => OptionValue::Null,
            Value::Bool(b) => OptionValue::Bool(b),
            Value::Number(n) => OptionValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => OptionValue::String(s),
            Value::Array(items) => {
                OptionValue::Array(items.into_iter().map(OptionValue::from).collect())
            }
            Value::Object(map) => OptionValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, OptionValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl<F> From<bool> for OptionValue<F> {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl<F> From<f64> for OptionValue<F> {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl<F> From<&str> for OptionValue<F> {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl<F> From<String> for OptionValue<F> {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl<F> From<Vec<OptionValue<F>>> for OptionValue<F> {
    fn from(value: Vec<OptionValue<F>>) -> Self {
        OptionValue::Array(value)
    }
}
