//! Parser registry
//!
//! Maps [`ParserKey`]s to factories. Owned by the [`App`](crate::App) and
//! filled before the first command runs; later registrations under the same
//! key replace the earlier factory.

use super::builtin::{JsonFileParser, JsonParser};
use super::{ParserFactory, ParserKey, ParserRef};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of parser factories
#[derive(Clone)]
pub struct ParserRegistry {
    factories: HashMap<ParserKey, Arc<dyn ParserFactory>>,
}

impl ParserRegistry {
    /// Create a registry holding the built-in `json` and `jsonfile` parsers
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(ParserKey::Json, JsonParser::factory);
        registry.register(ParserKey::JsonFile, JsonFileParser::factory);
        registry
    }

    /// Create a registry without any parser
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory. Returns `true` when an earlier factory was replaced.
    pub fn register<F>(&mut self, key: ParserKey, factory: F) -> bool
    where
        F: ParserFactory + 'static,
    {
        let replaced = self.factories.insert(key.clone(), Arc::new(factory)).is_some();
        if replaced {
            debug!(target: "argbind::parser", parser = %key, "replaced parser factory");
        } else {
            debug!(target: "argbind::parser", parser = %key, "registered parser factory");
        }
        replaced
    }

    /// Register a factory under a free-form name
    pub fn register_named<F>(&mut self, name: &str, factory: F) -> bool
    where
        F: ParserFactory + 'static,
    {
        self.register(ParserKey::from_name(name), factory)
    }

    /// Get the factory registered under `key`
    pub fn lookup(&self, key: &ParserKey) -> Option<Arc<dyn ParserFactory>> {
        self.factories.get(key).cloned()
    }

    /// Resolve a `parser:"..."` name into a reference
    pub fn lookup_ref(&self, name: &str) -> Option<ParserRef> {
        let key = ParserKey::from_name(name);
        self.lookup(&key).map(|factory| ParserRef::new(key, factory))
    }

    /// Check if a key is registered
    pub fn contains(&self, key: &ParserKey) -> bool {
        self.factories.contains_key(key)
    }

    /// All registered keys
    pub fn keys(&self) -> Vec<&ParserKey> {
        self.factories.keys().collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliResult;
    use crate::flag::{FieldKind, Scalar};
    use crate::parser::FlagParser;
    use serde_json::{json, Value};

    fn upper(_: &FieldKind) -> Box<dyn FlagParser> {
        Box::new(|raw: &str| -> CliResult<Value> { Ok(Value::String(raw.to_uppercase())) })
    }

    fn lower(_: &FieldKind) -> Box<dyn FlagParser> {
        Box::new(|raw: &str| -> CliResult<Value> { Ok(Value::String(raw.to_lowercase())) })
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ParserRegistry::new();
        assert!(registry.contains(&ParserKey::Json));
        assert!(registry.contains(&ParserKey::JsonFile));
        assert!(ParserRegistry::empty().keys().is_empty());
    }

    #[test]
    fn test_register_and_lookup_named() {
        let mut registry = ParserRegistry::new();
        assert!(!registry.register_named("upper", upper));

        let parser = registry.lookup_ref("upper").unwrap();
        assert_eq!(parser.key(), &ParserKey::Named("upper".to_string()));
        let value = parser.create(&FieldKind::Scalar(Scalar::Str)).parse("abc").unwrap();
        assert_eq!(value, json!("ABC"));

        assert!(registry.lookup_ref("missing").is_none());
    }

    #[test]
    fn test_last_writer_wins() {
        let mut registry = ParserRegistry::new();
        registry.register_named("case", upper);
        assert!(registry.register_named("case", lower));

        let parser = registry.lookup(&ParserKey::named("case")).unwrap();
        let value = parser.create(&FieldKind::Scalar(Scalar::Str)).parse("MiXed").unwrap();
        assert_eq!(value, json!("mixed"));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(ParserKey::from_name("json"), ParserKey::Json);
        assert_eq!(ParserKey::named("jsonfile"), ParserKey::JsonFile);
        assert_eq!(ParserKey::named("file").as_str(), "file");
        assert_eq!(ParserKey::JsonFile.to_string(), "jsonfile");
    }
}
