//! Typed values held by a render [`Context`](crate::Context).

use std::fmt;

/// The runtime type of one context entry.
///
/// `Display` produces the *display form* used for plain `{{name}}`
/// directives and as the input the case-folding helpers operate on.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single string.
    Text(String),
    /// An ordered list of strings, e.g. the artists of a track.
    TextList(Vec<String>),
    /// A signed 64-bit integer. Durations and positions are microseconds.
    Integer(i64),
    /// A 64-bit float, e.g. a volume level.
    Float(f64),
    /// Anything else, printed through its structural representation.
    Opaque(serde_json::Value),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::TextList(items) => f.write_str(&items.join(", ")),
            Value::Integer(n) => write!(f, "{n}"),
            // Debug keeps the decimal point on whole numbers ("1.0").
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Opaque(v) => write!(f, "{v}"),
        }
    }
}

impl Value {
    /// Map a JSON value onto the closest variant.
    ///
    /// Strings become `Text`, arrays made only of strings become
    /// `TextList`, numbers become `Integer` when they fit in an `i64` and
    /// `Float` otherwise. Everything else is kept as `Opaque`.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(x)) => Value::Float(x),
                (None, None) => Value::Opaque(serde_json::Value::Number(n)),
            },
            serde_json::Value::Array(items) if items.iter().all(|v| v.is_string()) => {
                Value::TextList(
                    items
                        .into_iter()
                        .filter_map(|v| match v {
                            serde_json::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Value::Opaque(other),
        }
    }

    /// Short type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::TextList(_) => "text list",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Opaque(_) => "opaque",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::TextList(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::TextList(items.into_iter().map(str::to_string).collect())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
