#![deny(unsafe_code)]

//! trackfmt core: a small template engine for media player status lines.
//!
//! A format string such as `{{artist}} - {{title}} ({{duration(mpris:length)}})`
//! is tokenized once and rendered against a [`Context`] of named, typed
//! [`Value`]s, optionally passing values through helpers from a
//! [`HelperRegistry`]. Tokenizing and rendering are pure and synchronous;
//! the only shared state is the read-only built-in registry.

/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Name → value mapping for one render call.
pub mod context;
/// Tokenizer and evaluator errors.
pub mod error;
/// Template helper trait and registry.
pub mod helpers;
/// Short aliases for namespaced metadata keys.
pub mod metadata;
/// Read-only player queries and their contexts.
pub mod query;
/// Tokenizer, evaluator, and compiled templates.
pub mod template;
/// Typed context values.
pub mod value;

pub use context::Context;
pub use error::FormatError;
pub use helpers::{Helper, HelperRegistry};
pub use metadata::{MetadataAliases, metadata_context};
pub use query::Query;
pub use template::{Engine, Template, Token, expand, render, tokenize};
pub use value::Value;
