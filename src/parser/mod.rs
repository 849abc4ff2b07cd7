//! Flag value parsers
//!
//! A [`ParserFactory`] is registered under a [`ParserKey`] and produces a
//! [`FlagParser`] for the kind of field it is attached to. Fields reach a
//! factory either through the `parser:"key"` sub-tag or by declaring a
//! [`FieldKind::Custom`](crate::flag::FieldKind::Custom) kind.

pub mod builtin;
pub mod registry;

pub use builtin::{JsonFileParser, JsonParser};
pub use registry::ParserRegistry;

use crate::error::CliResult;
use crate::flag::FieldKind;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Converts one raw token into a field value
pub trait FlagParser {
    /// Parse `raw` into the JSON value bound to the field
    fn parse(&self, raw: &str) -> CliResult<Value>;
}

impl<F> FlagParser for F
where
    F: Fn(&str) -> CliResult<Value>,
{
    fn parse(&self, raw: &str) -> CliResult<Value> {
        self(raw)
    }
}

/// Produces a parser for a given field kind
pub trait ParserFactory {
    /// Create the parser used for a field of `kind`
    fn create(&self, kind: &FieldKind) -> Box<dyn FlagParser>;
}

impl<F> ParserFactory for F
where
    F: Fn(&FieldKind) -> Box<dyn FlagParser>,
{
    fn create(&self, kind: &FieldKind) -> Box<dyn FlagParser> {
        self(kind)
    }
}

/// Registry key of a parser factory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParserKey {
    /// Value is JSON text
    Json,
    /// Value is the path of a JSON file
    JsonFile,
    /// Third-party parser registered under a free-form name
    Named(String),
}

impl ParserKey {
    /// Key for a free-form name
    pub fn named(name: impl Into<String>) -> Self {
        Self::from_name(&name.into())
    }

    /// Resolve the name used in `parser:"..."` sub-tags
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "jsonfile" => Self::JsonFile,
            other => Self::Named(other.to_string()),
        }
    }

    /// Name used in `parser:"..."` sub-tags
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "json",
            Self::JsonFile => "jsonfile",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for ParserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A factory resolved from the registry, kept together with its key
#[derive(Clone)]
pub struct ParserRef {
    key: ParserKey,
    factory: Arc<dyn ParserFactory>,
}

impl ParserRef {
    pub(crate) fn new(key: ParserKey, factory: Arc<dyn ParserFactory>) -> Self {
        Self { key, factory }
    }

    /// Registry key
    pub fn key(&self) -> &ParserKey {
        &self.key
    }

    /// Create a parser for `kind`
    pub fn create(&self, kind: &FieldKind) -> Box<dyn FlagParser> {
        self.factory.create(kind)
    }
}

impl fmt::Debug for ParserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRef").field("key", &self.key).finish()
    }
}
