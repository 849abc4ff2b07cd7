//! Annotation compiler
//!
//! Turns one field's annotation string into a [`FlagSpec`].

use super::multitag::MultiTag;
use super::*;
use crate::error::{CliError, CliResult};
use crate::parser::{ParserRef, ParserRegistry};
use tracing::debug;

/// Compiled definition of one command-line option
#[derive(Debug, Clone)]
pub struct FlagSpec {
    /// Single-dash aliases, e.g. `-n`
    pub short_names: Vec<String>,
    /// Double-dash aliases, e.g. `--name`
    pub long_names: Vec<String>,
    /// `*` modifier
    pub is_required: bool,
    /// `!` modifier
    pub is_force: bool,
    /// Declared through `pw`
    pub is_password: bool,
    /// Declared through `edit`
    pub is_edit: bool,
    /// Scratch file from the `edit:"FILE:..."` form
    pub edit_file: Option<String>,
    /// `usage` text
    pub usage: String,
    /// `dft` expression
    pub default: Option<String>,
    /// `ignoreDft`
    pub ignore_default: bool,
    /// `ignoreRequired`
    pub ignore_required: bool,
    /// `name` display override
    pub name: Option<String>,
    /// `prompt` text
    pub prompt: Option<String>,
    /// `sep` for map entries
    pub map_sep: String,
    /// `hidden`
    pub hidden: bool,
    /// Resolved `parser` reference
    pub parser: Option<ParserRef>,
}

impl FlagSpec {
    /// All aliases, short ones first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.short_names
            .iter()
            .chain(self.long_names.iter())
            .map(String::as_str)
    }

    /// Aliases joined for display, e.g. `-n, --name`
    pub fn display_names(&self) -> String {
        self.names().collect::<Vec<_>>().join(NAME_SEP)
    }

    /// Whether `name` (with its dashes) addresses this flag
    pub fn matches(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

/// Compile the annotation of field `field_name`.
///
/// Returns `Ok(None)` when the name list contains a lone `-`: the field is
/// excluded from binding and from help text. The returned spec is only
/// assembled once every sub-tag validated, so a failed compile leaves
/// nothing half-built.
pub fn compile(
    field_name: &str,
    annotation: &str,
    registry: &ParserRegistry,
) -> CliResult<Option<FlagSpec>> {
    let tag = MultiTag::parse(annotation)?;

    let mut mode_count = 0;
    let mut names = "";
    let mut is_password = false;
    let mut is_edit = false;
    let mut edit_file = None;

    if let Some(cli) = tag.get_non_empty(TAG_CLI) {
        names = cli;
        mode_count += 1;
    }

    if let Some(pw) = tag.get_non_empty(TAG_PW) {
        is_password = true;
        names = pw;
        mode_count += 1;
    }

    if let Some(edit) = tag.get_non_empty(TAG_EDIT) {
        let mut edit = edit;
        if let Some(idx) = edit.find(':').filter(|&idx| idx > 0) {
            edit_file = Some(edit[..idx].to_string());
            edit = &edit[idx + 1..];
        }
        is_edit = true;
        names = edit;
        mode_count += 1;
    }

    if mode_count > 1 {
        return Err(CliError::TooManyModeTags);
    }

    let usage = tag.get(TAG_USAGE).unwrap_or_default().to_string();
    let default = tag.get_non_empty(TAG_DEFAULT).map(str::to_string);
    let ignore_default = bool_tag(&tag, TAG_IGNORE_DEFAULT)?;
    let ignore_required = bool_tag(&tag, TAG_IGNORE_REQUIRED)?;
    let name = tag.get_non_empty(TAG_NAME).map(str::to_string);
    let prompt = tag.get_non_empty(TAG_PROMPT).map(str::to_string);

    let parser = tag.get_non_empty(TAG_PARSER).and_then(|parser_name| {
        let found = registry.lookup_ref(parser_name);
        if found.is_none() {
            debug!(target: "argbind::tag", field = field_name, parser = parser_name, "ignoring unregistered parser");
        }
        found
    });

    let map_sep = tag
        .get_non_empty(TAG_SEP)
        .unwrap_or(DEFAULT_MAP_SEP)
        .to_string();
    let hidden = bool_tag(&tag, TAG_HIDDEN)?;

    let (is_required, is_force, names) = strip_modifiers(names);

    let mut short_names = Vec::new();
    let mut long_names = Vec::new();
    for token in names.split(',').map(str::trim) {
        if token == DASH_ONE {
            return Ok(None);
        }
        match token.chars().count() {
            0 => continue,
            1 => short_names.push(format!("{}{}", DASH_ONE, token)),
            _ => long_names.push(format!("{}{}", DASH_TWO, token)),
        }
    }
    if short_names.is_empty() && long_names.is_empty() {
        long_names.push(format!("{}{}", DASH_TWO, field_name));
    }

    Ok(Some(FlagSpec {
        short_names,
        long_names,
        is_required,
        is_force,
        is_password,
        is_edit,
        edit_file,
        usage,
        default,
        ignore_default,
        ignore_required,
        name,
        prompt,
        map_sep,
        hidden,
        parser,
    }))
}

/// Strip leading `*` / `!` modifiers in any order
fn strip_modifiers(names: &str) -> (bool, bool, &str) {
    let mut required = false;
    let mut force = false;
    let mut rest = names.trim();
    loop {
        if let Some(stripped) = rest.strip_prefix('*') {
            required = true;
            rest = stripped.trim();
        } else if let Some(stripped) = rest.strip_prefix('!') {
            force = true;
            rest = stripped.trim();
        } else {
            break;
        }
    }
    (required, force, rest)
}

fn bool_tag(tag: &MultiTag, key: &str) -> CliResult<bool> {
    match tag.get_non_empty(key) {
        None => Ok(false),
        Some(value) => parse_bool(value).ok_or_else(|| CliError::InvalidBool {
            tag: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Boolean literal: `1 t T TRUE true True` / `0 f F FALSE false False`
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
