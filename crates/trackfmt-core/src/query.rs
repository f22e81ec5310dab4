//! Read-only player queries and the contexts they render against.
//!
//! Each query owns the data a player reported (status, volume, position,
//! or a metadata map). Without a format string a query prints its plain
//! default output; with one, the format is rendered against the query's
//! context instead.

use tracing::debug;

use crate::context::Context;
use crate::error::FormatError;
use crate::metadata::MetadataAliases;
use crate::template::{Engine, Template};
use crate::value::Value;

/// Printed by a status query when the player reports no status.
pub const STATUS_UNAVAILABLE: &str = "Not available";

/// A read-only query against one player's reported data.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Playback status, e.g. `Playing`. `None` when the player has none.
    Status(Option<String>),
    /// Volume level, nominally 0.0 to 1.0.
    Volume(f64),
    /// Playback position in microseconds.
    Position(i64),
    /// Track metadata and, optionally, the keys to print by default.
    Metadata { metadata: Context, keys: Vec<String> },
}

impl Query {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Query::Status(_) => "status",
            Query::Volume(_) => "volume",
            Query::Position(_) => "position",
            Query::Metadata { .. } => "metadata",
        }
    }

    /// The render context for this query.
    ///
    /// Status, volume and position produce a single entry named after the
    /// query. Metadata produces the raw map with `aliases` applied.
    pub fn context(&self, aliases: &MetadataAliases) -> Context {
        let mut context = Context::new();
        match self {
            Query::Status(Some(status)) => context.insert("status", status.as_str()),
            Query::Status(None) => {}
            Query::Volume(level) => context.insert("volume", Value::Float(*level)),
            Query::Position(micros) => context.insert("position", Value::Integer(*micros)),
            Query::Metadata { metadata, .. } => {
                context = metadata.clone();
                aliases.apply(&mut context);
            }
        }
        context
    }

    /// The output printed when no format string is given.
    ///
    /// Volume and position print six decimal places, position in seconds.
    /// Metadata prints the selected keys one per line, skipping keys that
    /// are absent, or every raw `key: value` pair sorted by key when no
    /// keys were selected. Aliases only resolve selected keys.
    pub fn default_output(&self, aliases: &MetadataAliases) -> String {
        match self {
            Query::Status(status) => status.as_deref().unwrap_or(STATUS_UNAVAILABLE).to_string(),
            Query::Volume(level) => format!("{level:.6}"),
            Query::Position(micros) => format!("{:.6}", *micros as f64 / 1_000_000.0),
            Query::Metadata { metadata, keys } => {
                if keys.is_empty() {
                    // The full listing shows raw keys only, never alias copies.
                    let mut names: Vec<&str> = metadata.keys().collect();
                    names.sort_unstable();
                    names
                        .into_iter()
                        .filter_map(|name| metadata.get(name).map(|v| format!("{name}: {v}")))
                        .collect::<Vec<_>>()
                        .join("\n")
                } else {
                    let context = self.context(aliases);
                    keys.iter()
                        .filter_map(|key| context.get(key).map(Value::to_string))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
        }
    }

    /// Render `template` against this query's context, or fall back to the
    /// default output when there is no template.
    pub fn output(
        &self,
        engine: &Engine<'_>,
        template: Option<&Template>,
        aliases: &MetadataAliases,
    ) -> Result<String, FormatError> {
        match template {
            Some(template) => {
                debug!(query = self.name(), format = template.source(), "rendering query");
                engine.render(template, &self.context(aliases))
            }
            None => Ok(self.default_output(aliases)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn aliases() -> MetadataAliases {
        MetadataAliases::default()
    }

    fn track() -> Context {
        Context::new()
            .with("xesam:artist", Value::from(vec!["Bowie"]))
            .with("xesam:title", "Heroes")
            .with("mpris:length", Value::Integer(371_000_000))
    }

    #[test]
    fn test_status_context_and_default() {
        let query = Query::Status(Some("Playing".to_string()));
        assert_eq!(query.context(&aliases()).get("status"), Some(&Value::from("Playing")));
        assert_eq!(query.default_output(&aliases()), "Playing");
    }

    #[test]
    fn test_unknown_status() {
        let query = Query::Status(None);
        assert!(query.context(&aliases()).is_empty());
        assert_eq!(query.default_output(&aliases()), STATUS_UNAVAILABLE);
    }

    #[test]
    fn test_volume_default_output() {
        assert_eq!(Query::Volume(0.75).default_output(&aliases()), "0.750000");
    }

    #[test]
    fn test_position_default_output_in_seconds() {
        assert_eq!(Query::Position(42_500_000).default_output(&aliases()), "42.500000");
    }

    #[test]
    fn test_metadata_selected_keys() {
        let query = Query::Metadata {
            metadata: track(),
            keys: vec!["title".to_string(), "missing".to_string(), "artist".to_string()],
        };
        assert_eq!(query.default_output(&aliases()), "Heroes\nBowie");
    }

    #[test]
    fn test_metadata_all_keys_sorted() {
        let query = Query::Metadata {
            metadata: Context::new().with("xesam:title", "Heroes").with("b", "2"),
            keys: Vec::new(),
        };
        assert_eq!(
            query.default_output(&MetadataAliases::empty()),
            "b: 2\nxesam:title: Heroes"
        );
    }

    #[test]
    fn test_metadata_all_keys_omits_alias_copies() {
        let query = Query::Metadata {
            metadata: Context::new().with("xesam:artist", "Bowie"),
            keys: Vec::new(),
        };
        assert_eq!(query.default_output(&aliases()), "xesam:artist: Bowie");
    }

    #[test]
    fn test_output_with_template() {
        let engine = Engine::new();
        let template = Template::parse("{{artist}} - {{title}} [{{duration(mpris:length)}}]").unwrap();
        let query = Query::Metadata {
            metadata: track(),
            keys: Vec::new(),
        };
        assert_eq!(
            query.output(&engine, Some(&template), &aliases()).unwrap(),
            "Bowie - Heroes [6:11]"
        );
    }

    #[test]
    fn test_output_without_template() {
        let engine = Engine::new();
        let query = Query::Volume(1.0);
        assert_eq!(query.output(&engine, None, &aliases()).unwrap(), "1.000000");
    }

    #[test]
    fn test_position_with_duration_helper() {
        let engine = Engine::new();
        let template = Template::parse("{{duration(position)}}").unwrap();
        let query = Query::Position(3_725_000_000);
        assert_eq!(
            query.output(&engine, Some(&template), &aliases()).unwrap(),
            "1:02:05"
        );
    }

    #[test]
    fn test_unknown_helper_surfaces() {
        let engine = Engine::new();
        let template = Template::parse("{{nope(status)}}").unwrap();
        let query = Query::Status(Some("Paused".to_string()));
        assert!(matches!(
            query.output(&engine, Some(&template), &aliases()),
            Err(FormatError::UnknownFunction(_))
        ));
    }
}
