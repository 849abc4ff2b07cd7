//! Sub-tag multi-map
//!
//! An annotation string is a sequence of `key:"value"` pairs separated by
//! whitespace. Values are double-quoted and may contain backslash escapes,
//! so separators can be embedded. Keys may repeat; insertion order is kept.

use crate::error::{CliError, CliResult};

/// Order-preserving key -> value multi-map parsed from an annotation string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiTag {
    entries: Vec<(String, String)>,
}

impl MultiTag {
    /// Parse an annotation string
    pub fn parse(tag: &str) -> CliResult<Self> {
        let mut entries = Vec::new();
        let bytes = tag.as_bytes();
        let mut i = 0;

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }

            let key_start = i;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == key_start || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                return Err(CliError::MalformedTag(tag.to_string()));
            }
            let key = &tag[key_start..i];

            // skip `:"`
            i += 2;
            let mut value = String::new();
            let mut closed = false;
            let mut chars = tag[i..].char_indices();
            while let Some((offset, c)) = chars.next() {
                match c {
                    '"' => {
                        i += offset + 1;
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((_, escaped)) => value.push(escaped),
                        None => break,
                    },
                    other => value.push(other),
                }
            }
            if !closed {
                return Err(CliError::MalformedTag(tag.to_string()));
            }

            entries.push((key.to_string(), value));
        }

        Ok(Self { entries })
    }

    /// Last value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Last non-empty value recorded for `key`
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Every value recorded for `key`, in order
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Keys in first-seen order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (k, _) in &self.entries {
            if !keys.contains(&k.as_str()) {
                keys.push(k);
            }
        }
        keys
    }

    /// Whether no sub-tag was present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
