//! The name → value mapping a format string is rendered against.

use std::collections::HashMap;

use crate::value::Value;

/// A set of named, typed values built fresh for one render call.
///
/// Keys are case-sensitive and unique; inserting an existing key replaces
/// its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from the entries of a JSON object.
    ///
    /// Each entry is converted with [`Value::from_json`].
    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        object
            .into_iter()
            .map(|(key, value)| (key, Value::from_json(value)))
            .collect()
    }

    /// Insert a value, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Insert a value and return the context (fluent form of [`insert`](Self::insert)).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value only if `name` is not already present.
    ///
    /// Returns `true` when the value was inserted.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let name = name.into();
        if self.values.contains_key(&name) {
            return false;
        }
        self.values.insert(name, value.into());
        true
    }

    /// Look up a value by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether a value exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// All names in the context, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
