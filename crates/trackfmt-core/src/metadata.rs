//! Metadata context construction.
//!
//! Player metadata arrives keyed by namespaced names such as
//! `xesam:artist`. Before rendering, short aliases are copied in so
//! formats can say `{{artist}}` instead of `{{xesam:artist}}`.

use trackfmt_config::MetadataConfig;
use tracing::trace;

use crate::context::Context;

/// The built-in aliases, as `(alias, source key)` pairs.
pub const DEFAULT_ALIASES: [(&str, &str); 3] = [
    ("artist", "xesam:artist"),
    ("album", "xesam:album"),
    ("title", "xesam:title"),
];

/// An ordered table of short aliases for metadata keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataAliases {
    entries: Vec<(String, String)>,
}

impl MetadataAliases {
    /// A table with no aliases.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The built-in aliases followed by the configured extras.
    pub fn from_config(config: &MetadataConfig) -> Self {
        let mut aliases = Self::default();
        for (alias, source) in &config.aliases {
            aliases.push(alias, source);
        }
        aliases
    }

    /// Append an alias. Earlier entries win when two aliases share a name.
    pub fn push(&mut self, alias: impl Into<String>, source: impl Into<String>) {
        self.entries.push((alias.into(), source.into()));
    }

    /// Fluent form of [`push`](Self::push).
    pub fn with(mut self, alias: impl Into<String>, source: impl Into<String>) -> Self {
        self.push(alias, source);
        self
    }

    /// Look up the source key an alias copies from.
    pub fn source_of(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == alias)
            .map(|(_, source)| source.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, s)| (a.as_str(), s.as_str()))
    }

    /// Copy each source value to its alias.
    ///
    /// An alias is only written when it is absent from the context and its
    /// source key is present; values supplied under the alias name are
    /// never overwritten.
    pub fn apply(&self, context: &mut Context) {
        for (alias, source) in &self.entries {
            if context.contains(alias) {
                continue;
            }
            if let Some(value) = context.get(source).cloned() {
                trace!(alias = %alias, source = %source, "adding metadata alias");
                context.insert(alias.clone(), value);
            }
        }
    }
}

impl Default for MetadataAliases {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ALIASES
                .iter()
                .map(|(alias, source)| (alias.to_string(), source.to_string()))
                .collect(),
        }
    }
}

/// Build a render context from raw metadata, adding the default aliases.
pub fn metadata_context(raw: Context) -> Context {
    let mut context = raw;
    MetadataAliases::default().apply(&mut context);
    context
}
