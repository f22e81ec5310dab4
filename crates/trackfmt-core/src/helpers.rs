//! Helper functions callable from a format string as `{{name(var)}}`.
//!
//! A helper takes one [`Value`] and returns the text to substitute, or
//! `None` when it does not support that value's type. `None` is not an
//! error: the directive simply contributes nothing to the output.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::value::Value;

/// A named template helper.
pub trait Helper: Send + Sync {
    /// The name used to call this helper from a format string.
    fn name(&self) -> &str;

    /// A short description of what this helper does.
    fn description(&self) -> &str;

    /// Apply the helper to a value.
    fn apply(&self, value: &Value) -> Option<String>;
}

/// Lowercase the display form of any value.
pub struct Lowercase;

impl Helper for Lowercase {
    fn name(&self) -> &str {
        "lc"
    }

    fn description(&self) -> &str {
        "Lowercase the printed value"
    }

    fn apply(&self, value: &Value) -> Option<String> {
        Some(value.to_string().to_lowercase())
    }
}

/// Uppercase the display form of any value.
pub struct Uppercase;

impl Helper for Uppercase {
    fn name(&self) -> &str {
        "uc"
    }

    fn description(&self) -> &str {
        "Uppercase the printed value"
    }

    fn apply(&self, value: &Value) -> Option<String> {
        Some(value.to_string().to_uppercase())
    }
}

/// Format an integer number of microseconds as `H:MM:SS` or `M:SS`.
pub struct Duration;

impl Helper for Duration {
    fn name(&self) -> &str {
        "duration"
    }

    fn description(&self) -> &str {
        "Format microseconds as H:MM:SS or M:SS"
    }

    fn apply(&self, value: &Value) -> Option<String> {
        match value {
            Value::Integer(micros) => Some(format_duration(*micros)),
            _ => None,
        }
    }
}

/// Format a duration in microseconds.
///
/// Hours are only shown when non-zero. Minutes and seconds are padded to
/// two digits unless they lead the output. Negative input is not treated
/// specially.
pub fn format_duration(micros: i64) -> String {
    let seconds = (micros / 1_000_000) % 60;
    let minutes = (micros / 60_000_000) % 60;
    let hours = micros / 3_600_000_000;

    if hours != 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// A helper backed by a plain function.
pub struct FnHelper {
    name: String,
    description: String,
    func: fn(&Value) -> Option<String>,
}

impl FnHelper {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        func: fn(&Value) -> Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            func,
        }
    }
}

impl Helper for FnHelper {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, value: &Value) -> Option<String> {
        (self.func)(value)
    }
}

/// Registry of helpers, looked up by exact name.
///
/// Populate a registry up front and share it read-only afterwards;
/// [`HelperRegistry::builtin`] is the process-wide instance.
pub struct HelperRegistry {
    helpers: HashMap<String, Box<dyn Helper>>,
}

impl HelperRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            helpers: HashMap::new(),
        }
    }

    /// Create a registry holding `lc`, `uc` and `duration`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Lowercase));
        registry.register(Box::new(Uppercase));
        registry.register(Box::new(Duration));
        registry
    }

    /// The shared built-in registry, constructed on first use.
    pub fn builtin() -> &'static HelperRegistry {
        static BUILTIN: OnceLock<HelperRegistry> = OnceLock::new();
        BUILTIN.get_or_init(Self::with_builtins)
    }

    /// Register a helper. A helper with the same name is replaced.
    pub fn register(&mut self, helper: Box<dyn Helper>) {
        let name = helper.name().to_string();
        self.helpers.insert(name, helper);
    }

    /// Register a plain function as a helper.
    pub fn register_fn(
        &mut self,
        name: &str,
        description: &str,
        func: fn(&Value) -> Option<String>,
    ) {
        self.register(Box::new(FnHelper::new(name, description, func)));
    }

    /// Look up a helper by name.
    pub fn get(&self, name: &str) -> Option<&dyn Helper> {
        self.helpers.get(name).map(|h| h.as_ref())
    }

    /// Registered helper names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.helpers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }
}

impl Default for HelperRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_names() {
        let registry = HelperRegistry::builtin();
        assert_eq!(registry.names(), vec!["duration", "lc", "uc"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lowercase_uppercase() {
        assert_eq!(Lowercase.apply(&Value::from("HELLO")).as_deref(), Some("hello"));
        assert_eq!(Uppercase.apply(&Value::from("hi")).as_deref(), Some("HI"));
    }

    #[test]
    fn test_case_folding_uses_display_form() {
        let artists = Value::from(vec!["Bowie", "Eno"]);
        assert_eq!(Uppercase.apply(&artists).as_deref(), Some("BOWIE, ENO"));
        assert_eq!(
            Uppercase.apply(&Value::Opaque(json!(true))).as_deref(),
            Some("TRUE")
        );
        assert_eq!(Lowercase.apply(&Value::Integer(7)).as_deref(), Some("7"));
    }

    #[test]
    fn test_case_folding_is_unicode_aware() {
        assert_eq!(Uppercase.apply(&Value::from("björk")).as_deref(), Some("BJÖRK"));
    }

    #[test]
    fn test_duration_minutes_seconds() {
        assert_eq!(format_duration(125_000_000), "2:05");
        assert_eq!(format_duration(90_000_000), "1:30");
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59_999_999), "0:59");
    }

    #[test]
    fn test_duration_with_hours() {
        assert_eq!(format_duration(3_725_000_000), "1:02:05");
        assert_eq!(format_duration(36_000_000_000), "10:00:00");
    }

    #[test]
    fn test_duration_rejects_non_integers() {
        assert_eq!(Duration.apply(&Value::Float(1.0)), None);
        assert_eq!(Duration.apply(&Value::from("125000000")), None);
        assert_eq!(
            Duration.apply(&Value::Integer(125_000_000)).as_deref(),
            Some("2:05")
        );
    }

    #[test]
    fn test_register_fn() {
        fn reverse(value: &Value) -> Option<String> {
            match value {
                Value::Text(s) => Some(s.chars().rev().collect()),
                _ => None,
            }
        }

        let mut registry = HelperRegistry::with_builtins();
        registry.register_fn("rev", "Reverse text", reverse);

        let helper = registry.get("rev").unwrap();
        assert_eq!(helper.description(), "Reverse text");
        assert_eq!(helper.apply(&Value::from("abc")).as_deref(), Some("cba"));
        assert_eq!(helper.apply(&Value::Integer(1)), None);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_empty_registry() {
        let registry = HelperRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("lc").is_none());
    }
}
