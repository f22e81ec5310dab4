//! Format strings: tokenizing, compiling, and rendering.
//!
//! The grammar has exactly three forms: literal text, `{{name}}`, and
//! `{{fn(name)}}`. There are no operators, conditionals, or nested calls.
//!
//! ```
//! use trackfmt_core::{Context, Value, expand};
//!
//! let ctx = Context::new()
//!     .with("artist", "Bowie")
//!     .with("length", Value::Integer(125_000_000));
//! assert_eq!(expand("{{uc(artist)}} {{duration(length)}}", &ctx).unwrap(), "BOWIE 2:05");
//! ```

mod render;
mod token;

pub use render::render;
pub use token::{Token, tokenize};

use std::str::FromStr;

use tracing::debug;
use trackfmt_config::FormatConfig;

use crate::context::Context;
use crate::error::FormatError;
use crate::helpers::HelperRegistry;

/// A tokenized format string that can be rendered any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    tokens: Vec<Token>,
}

impl Template {
    /// Tokenize a format string.
    pub fn parse(format: &str) -> Result<Self, FormatError> {
        Ok(Self {
            source: format.to_string(),
            tokens: tokenize(format)?,
        })
    }

    /// The format string this template was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Context names this template reads, in order of first use.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            let name = match token {
                Token::Passthrough(_) => continue,
                Token::Variable(name) => name,
                Token::Function { argument, .. } => argument,
            };
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Render against `context` with helpers from `registry`.
    pub fn render(&self, context: &Context, registry: &HelperRegistry) -> Result<String, FormatError> {
        render(&self.tokens, context, registry)
    }
}

impl FromStr for Template {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Compiles and renders format strings with a fixed helper registry and an
/// optional length limit.
#[derive(Clone, Copy)]
pub struct Engine<'r> {
    registry: &'r HelperRegistry,
    max_length: Option<usize>,
}

impl Engine<'static> {
    /// An engine using the built-in helpers and no length limit.
    pub fn new() -> Self {
        Self::with_registry(HelperRegistry::builtin())
    }

    /// An engine using the built-in helpers and the configured limits.
    pub fn from_config(config: &FormatConfig) -> Self {
        Self::new().with_max_length(config.max_length)
    }
}

impl Default for Engine<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Engine<'r> {
    /// An engine using a caller-provided registry.
    pub fn with_registry(registry: &'r HelperRegistry) -> Self {
        Self {
            registry,
            max_length: None,
        }
    }

    /// Reject format strings longer than `max_length` bytes.
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn registry(&self) -> &'r HelperRegistry {
        self.registry
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Check the length limit and tokenize.
    pub fn compile(&self, format: &str) -> Result<Template, FormatError> {
        if let Some(max) = self.max_length {
            if format.len() > max {
                return Err(FormatError::TooLong {
                    length: format.len(),
                    max,
                });
            }
        }
        let template = Template::parse(format)?;
        debug!(
            length = format.len(),
            tokens = template.tokens().len(),
            "compiled format string"
        );
        Ok(template)
    }

    /// Render a compiled template.
    pub fn render(&self, template: &Template, context: &Context) -> Result<String, FormatError> {
        template.render(context, self.registry)
    }

    /// Compile and render in one step.
    pub fn expand(&self, format: &str, context: &Context) -> Result<String, FormatError> {
        let template = self.compile(format)?;
        self.render(&template, context)
    }
}

/// Tokenize and render `format` with the built-in helpers.
pub fn expand(format: &str, context: &Context) -> Result<String, FormatError> {
    Engine::new().expand(format, context)
}
