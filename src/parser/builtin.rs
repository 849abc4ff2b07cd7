//! Built-in `json` and `jsonfile` parsers

use super::FlagParser;
use crate::error::{CliError, CliResult};
use crate::flag::FieldKind;
use serde_json::Value;

/// Parses the raw value as JSON text
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Factory registered as `json`
    pub fn factory(_kind: &FieldKind) -> Box<dyn FlagParser> {
        Box::new(JsonParser)
    }
}

impl FlagParser for JsonParser {
    fn parse(&self, raw: &str) -> CliResult<Value> {
        serde_json::from_str(raw)
            .map_err(|e| CliError::invalid_value("json", raw, e.to_string()))
    }
}

/// Reads the file named by the raw value and parses it as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileParser;

impl JsonFileParser {
    /// Factory registered as `jsonfile`
    pub fn factory(_kind: &FieldKind) -> Box<dyn FlagParser> {
        Box::new(JsonFileParser)
    }
}

impl FlagParser for JsonFileParser {
    fn parse(&self, raw: &str) -> CliResult<Value> {
        let content = std::fs::read_to_string(raw)?;
        serde_json::from_str(&content)
            .map_err(|e| CliError::invalid_value("jsonfile", raw, e.to_string()))
    }
}
