//! Flag set: compiled flags of one argument record and the token parser

use super::{FieldDescriptor, FieldKind, Scalar, HELP_FIELD};
use crate::error::{CliError, CliResult};
use crate::input::{scratch_path, Interact};
use crate::parser::{FlagParser, ParserRegistry};
use crate::tag::{compile, FlagSpec};
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use tracing::debug;

/// Ends option parsing; everything after it is positional
pub const END_OF_FLAGS: &str = "--";

enum ValueParser {
    Scalar(Scalar),
    Custom(Box<dyn FlagParser>),
}

/// One compiled, bindable field
pub struct Flag {
    field: String,
    kind: FieldKind,
    spec: FlagSpec,
    parser: ValueParser,
}

impl Flag {
    /// Field the value is bound to
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Type tag of the field
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Compiled annotation
    pub fn spec(&self) -> &FlagSpec {
        &self.spec
    }

    fn convert(&self, raw: &str) -> CliResult<Value> {
        match &self.parser {
            ValueParser::Scalar(scalar) => scalar
                .parse(raw)
                .map_err(|reason| CliError::invalid_value(self.spec.display_names(), raw, reason)),
            ValueParser::Custom(parser) => parser.parse(raw),
        }
    }

    fn prompt_text(&self) -> String {
        self.spec
            .prompt
            .clone()
            .unwrap_or_else(|| self.spec.display_names())
    }

    /// Value obtained from the user, if this flag knows how to ask for one
    fn ask(&self, interact: &dyn Interact) -> CliResult<Option<String>> {
        if self.spec.is_password {
            return interact.password(&self.prompt_text()).map(Some);
        }
        if self.spec.is_edit {
            return self.edit(interact).map(Some);
        }
        match &self.spec.prompt {
            Some(prompt) => interact.prompt(prompt).map(Some),
            None => Ok(None),
        }
    }

    fn edit(&self, interact: &dyn Interact) -> CliResult<String> {
        let path = scratch_path(self.spec.edit_file.as_deref(), &self.field);
        // the editor opens whatever the file already holds
        OpenOptions::new().create(true).append(true).open(&path)?;

        let content = interact.edit(&path);
        if self.spec.edit_file.is_none() {
            let _ = std::fs::remove_file(&path);
        }
        Ok(content?.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Result of parsing the tokens of one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    /// Bound values keyed by field name
    pub values: Map<String, Value>,
    /// Positional tokens left over
    pub args: Vec<String>,
}

impl ParsedArgs {
    /// Whether the `help` force flag was set
    pub fn help_requested(&self) -> bool {
        matches!(self.values.get(HELP_FIELD), Some(Value::Bool(true)))
    }
}

/// All flags of one argument record
#[derive(Default)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    /// Compile every field descriptor. Excluded fields are skipped.
    pub fn compile(fields: &[FieldDescriptor], registry: &ParserRegistry) -> CliResult<Self> {
        let mut flags = Vec::with_capacity(fields.len());
        for field in fields {
            let Some(spec) = compile(&field.name, &field.tag, registry)? else {
                debug!(target: "argbind::flag", field = %field.name, "field excluded");
                continue;
            };

            let parser = match (&spec.parser, &field.kind) {
                (Some(parser), kind) => ValueParser::Custom(parser.create(kind)),
                (None, FieldKind::Custom(key)) => {
                    let factory = registry.lookup(key).ok_or_else(|| CliError::ParserNotFound {
                        field: field.name.clone(),
                        key: key.to_string(),
                    })?;
                    ValueParser::Custom(factory.create(&field.kind))
                }
                (None, FieldKind::Scalar(s) | FieldKind::List(s) | FieldKind::Map(s)) => {
                    ValueParser::Scalar(*s)
                }
            };

            flags.push(Flag {
                field: field.name.clone(),
                kind: field.kind.clone(),
                spec,
                parser,
            });
        }
        Ok(Self { flags })
    }

    /// Compiled flags in declaration order
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Flag addressed by `name` (with dashes)
    pub fn find(&self, name: &str) -> Option<&Flag> {
        self.position(name).map(|idx| &self.flags[idx])
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.flags.iter().position(|f| f.spec.matches(name))
    }

    /// Parse the tokens left after routing, left to right in a single pass
    pub fn parse(&self, tokens: &[String], interact: &dyn Interact) -> CliResult<ParsedArgs> {
        let mut state = ParseState::new(self.flags.len());
        let mut args = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_str();
            i += 1;

            if token == END_OF_FLAGS {
                args.extend(tokens[i..].iter().cloned());
                break;
            }
            if !looks_like_flag(token) {
                args.push(token.to_string());
                continue;
            }

            let (name, inline) = match token.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (token, None),
            };
            let idx = self
                .position(name)
                .ok_or_else(|| CliError::UndefinedFlag(name.to_string()))?;
            let flag = &self.flags[idx];

            let raw = if flag.kind.is_bool() {
                inline.unwrap_or("true").to_string()
            } else if let Some(value) = inline {
                value.to_string()
            } else if flag.spec.is_password || flag.spec.is_edit {
                match tokens.get(i) {
                    Some(next) if !looks_like_flag(next) => {
                        i += 1;
                        next.clone()
                    }
                    _ => flag
                        .ask(interact)?
                        .ok_or_else(|| CliError::MissingValue(name.to_string()))?,
                }
            } else {
                match tokens.get(i) {
                    Some(next) => {
                        i += 1;
                        next.clone()
                    }
                    None => return Err(CliError::MissingValue(name.to_string())),
                }
            };

            state.assign(idx, flag, &raw)?;
        }

        let forced = self
            .flags
            .iter()
            .zip(&state.assigned)
            .any(|(flag, &assigned)| {
                assigned
                    && flag.spec.is_force
                    && (!flag.kind.is_bool() || state.values.get(&flag.field) != Some(&Value::Bool(false)))
            });

        for (idx, flag) in self.flags.iter().enumerate() {
            if state.assigned[idx] {
                continue;
            }

            if let Some(dft) = flag.spec.default.as_deref() {
                if !flag.spec.ignore_default {
                    let expanded = expand_default(dft);
                    state.assign(idx, flag, &expanded)?;
                    continue;
                }
            }

            if !flag.spec.is_required || flag.spec.ignore_required || forced {
                continue;
            }
            match flag.ask(interact)? {
                Some(raw) => state.assign(idx, flag, &raw)?,
                None => return Err(CliError::RequiredMissing(flag.spec.display_names())),
            }
        }

        Ok(ParsedArgs {
            values: state.values,
            args,
        })
    }
}

struct ParseState {
    values: Map<String, Value>,
    assigned: Vec<bool>,
}

impl ParseState {
    fn new(len: usize) -> Self {
        Self {
            values: Map::new(),
            assigned: vec![false; len],
        }
    }

    fn assign(&mut self, idx: usize, flag: &Flag, raw: &str) -> CliResult<()> {
        let key = flag.field.clone();
        match &flag.kind {
            FieldKind::List(_) => {
                let value = flag.convert(raw)?;
                let slot = self
                    .values
                    .entry(key)
                    .or_insert_with(|| Value::Array(Vec::new()));
                match slot {
                    Value::Array(items) => items.push(value),
                    other => *other = Value::Array(vec![value]),
                }
            }
            FieldKind::Map(_) => {
                let sep = flag.spec.map_sep.as_str();
                let (entry_key, entry_value) = raw.split_once(sep).ok_or_else(|| {
                    CliError::invalid_value(
                        flag.spec.display_names(),
                        raw,
                        format!("expected key{}value", sep),
                    )
                })?;
                let value = flag.convert(entry_value)?;
                let slot = self
                    .values
                    .entry(key)
                    .or_insert_with(|| Value::Object(Map::new()));
                match slot {
                    Value::Object(entries) => {
                        entries.insert(entry_key.to_string(), value);
                    }
                    other => {
                        let mut entries = Map::new();
                        entries.insert(entry_key.to_string(), value);
                        *other = Value::Object(entries);
                    }
                }
            }
            FieldKind::Scalar(_) | FieldKind::Custom(_) => {
                let value = flag.convert(raw)?;
                self.values.insert(key, value);
            }
        }
        self.assigned[idx] = true;
        Ok(())
    }
}

fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Expand `$VAR`, `${VAR}` and a leading `~`; unset variables become empty
fn expand_default(dft: &str) -> String {
    let env_expanded = shellexpand::env_with_context_no_errors(dft, |var| {
        Some(std::env::var(var).unwrap_or_default())
    });
    shellexpand::tilde(&env_expanded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserKey;
    use crate::test_utils::MockInteract;
    use serde_json::json;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn set(fields: Vec<FieldDescriptor>) -> FlagSet {
        FlagSet::compile(&fields, &ParserRegistry::new()).unwrap()
    }

    fn server_set() -> FlagSet {
        set(vec![
            FieldDescriptor::helper(),
            FieldDescriptor::new("host", FieldKind::STRING, r#"cli:"H,host" dft:"localhost""#),
            FieldDescriptor::new("port", FieldKind::UINT, r#"cli:"*p,port""#),
            FieldDescriptor::new("verbose", FieldKind::BOOL, r#"cli:"v""#),
            FieldDescriptor::new("tags", FieldKind::List(Scalar::Str), r#"cli:"t,tag""#),
            FieldDescriptor::new("env", FieldKind::Map(Scalar::Int), r#"cli:"D""#),
        ])
    }

    #[test]
    fn test_parse_mixed_tokens() {
        let parsed = server_set()
            .parse(
                &tokens(&["-p", "8080", "run", "--tag=a", "-v", "-t", "b", "-D", "x=1", "-Dy=2"]),
                &MockInteract::new(),
            )
            .unwrap_err();
        // `-Dy=2` splits at the first `=`
        assert!(matches!(parsed, CliError::UndefinedFlag(ref n) if n == "-Dy"));

        let parsed = server_set()
            .parse(
                &tokens(&["-p", "8080", "run", "--tag=a", "-v", "-t", "b", "-D", "x=1", "-D=y=2"]),
                &MockInteract::new(),
            )
            .unwrap();
        assert_eq!(parsed.args, vec!["run"]);
        assert_eq!(parsed.values["port"], json!(8080));
        assert_eq!(parsed.values["verbose"], json!(true));
        assert_eq!(parsed.values["tags"], json!(["a", "b"]));
        assert_eq!(parsed.values["env"], json!({"x": 1, "y": 2}));
        assert_eq!(parsed.values["host"], json!("localhost"));
        assert!(!parsed.help_requested());
    }

    #[test]
    fn test_end_of_flags() {
        let parsed = server_set()
            .parse(&tokens(&["-p", "1", "--", "-v", "--port"]), &MockInteract::new())
            .unwrap();
        assert_eq!(parsed.args, vec!["-v", "--port"]);
        assert!(!parsed.values.contains_key("verbose"));
    }

    #[test]
    fn test_bool_inline_value() {
        let parsed = server_set()
            .parse(&tokens(&["-p", "1", "-v=false", "x"]), &MockInteract::new())
            .unwrap();
        assert_eq!(parsed.values["verbose"], json!(false));
        assert_eq!(parsed.args, vec!["x"]);

        let err = server_set()
            .parse(&tokens(&["-p", "1", "-v=maybe"]), &MockInteract::new())
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidValue { .. }));
    }

    #[test]
    fn test_required_missing() {
        let err = server_set().parse(&[], &MockInteract::new()).unwrap_err();
        assert!(matches!(err, CliError::RequiredMissing(ref n) if n == "-p, --port"));
    }

    #[test]
    fn test_force_flag_skips_required() {
        let parsed = server_set()
            .parse(&tokens(&["--help"]), &MockInteract::new())
            .unwrap();
        assert!(parsed.help_requested());
        assert!(!parsed.values.contains_key("port"));
    }

    #[test]
    fn test_force_flag_false_keeps_required() {
        let err = server_set()
            .parse(&tokens(&["--help=false"]), &MockInteract::new())
            .unwrap_err();
        assert!(matches!(err, CliError::RequiredMissing(ref n) if n == "-p, --port"));
    }

    #[test]
    fn test_missing_value_and_bad_values() {
        let err = server_set().parse(&tokens(&["-p"]), &MockInteract::new()).unwrap_err();
        assert!(matches!(err, CliError::MissingValue(ref n) if n == "-p"));

        let err = server_set()
            .parse(&tokens(&["-p", "-1"]), &MockInteract::new())
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidValue { .. }));

        let err = server_set()
            .parse(&tokens(&["-p", "1", "-D", "novalue"]), &MockInteract::new())
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidValue { ref reason, .. } if reason == "expected key=value"));
    }

    #[test]
    fn test_default_expansion_and_ignore() {
        std::env::set_var("ARGBIND_TEST_USER", "gopher");
        let set = set(vec![
            FieldDescriptor::new("user", FieldKind::STRING, r#"cli:"u" dft:"$ARGBIND_TEST_USER""#),
            FieldDescriptor::new("shown", FieldKind::INT, r#"cli:"s" dft:"5" ignoreDft:"true""#),
            FieldDescriptor::new("hidden", FieldKind::STRING, r#"cli:"-" dft:"x""#),
            FieldDescriptor::new("suffix", FieldKind::STRING, r#"cli:"x" dft:"${ARGBIND_TEST_UNSET_VAR}.log""#),
        ]);
        assert_eq!(set.flags().len(), 3);

        let parsed = set.parse(&[], &MockInteract::new()).unwrap();
        assert_eq!(parsed.values["user"], json!("gopher"));
        assert!(!parsed.values.contains_key("shown"));
        assert!(!parsed.values.contains_key("hidden"));
        assert_eq!(parsed.values["suffix"], json!(".log"));
    }

    #[test]
    fn test_ignore_required() {
        let set = set(vec![FieldDescriptor::new(
            "id",
            FieldKind::INT,
            r#"cli:"*id" ignoreRequired:"true""#,
        )]);
        let parsed = set.parse(&[], &MockInteract::new()).unwrap();
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn test_password_prompting() {
        let set = set(vec![
            FieldDescriptor::new("user", FieldKind::STRING, r#"cli:"*u" prompt:"user name""#),
            FieldDescriptor::new("password", FieldKind::STRING, r#"pw:"*p,password""#),
        ]);

        let interact = MockInteract::with_answers(&["alice", "s3cret"]);
        let parsed = set.parse(&[], &interact).unwrap();
        assert_eq!(parsed.values["user"], json!("alice"));
        assert_eq!(parsed.values["password"], json!("s3cret"));
        assert_eq!(
            interact.calls(),
            vec!["prompt:user name", "password:-p, --password"]
        );

        // value given inline, nothing asked
        let interact = MockInteract::with_answers(&["alice"]);
        let parsed = set.parse(&tokens(&["--password", "hunter2"]), &interact).unwrap();
        assert_eq!(parsed.values["password"], json!("hunter2"));

        // flag present without a value
        let interact = MockInteract::with_answers(&["typed", "alice"]);
        let parsed = set.parse(&tokens(&["-p", "-u", "bob"]), &interact).unwrap();
        assert_eq!(parsed.values["password"], json!("typed"));
        assert_eq!(parsed.values["user"], json!("bob"));
    }

    #[test]
    fn test_edit_flag_uses_editor() {
        let set = set(vec![FieldDescriptor::new("msg", FieldKind::STRING, r#"edit:"m""#)]);
        let interact = MockInteract::with_answers(&["hello from editor\n"]);
        let parsed = set.parse(&tokens(&["-m"]), &interact).unwrap();
        assert_eq!(parsed.values["msg"], json!("hello from editor"));
        assert_eq!(interact.calls().len(), 1);
        assert!(interact.calls()[0].starts_with("edit:"));

        let parsed = set.parse(&tokens(&["-m", "inline"]), &MockInteract::new()).unwrap();
        assert_eq!(parsed.values["msg"], json!("inline"));
    }

    #[test]
    fn test_parser_sub_tag() {
        let set = set(vec![FieldDescriptor::new(
            "cfg",
            FieldKind::STRING,
            r#"cli:"c" parser:"json""#,
        )]);
        let parsed = set
            .parse(&tokens(&["-c", r#"{"a":[1,2]}"#]), &MockInteract::new())
            .unwrap();
        assert_eq!(parsed.values["cfg"], json!({"a": [1, 2]}));
    }

    #[test]
    fn test_custom_kind_requires_registration() {
        let fields = vec![FieldDescriptor::new(
            "content",
            FieldKind::Custom(ParserKey::named("upper")),
            r#"cli:"c""#,
        )];
        let err = FlagSet::compile(&fields, &ParserRegistry::new()).err().unwrap();
        assert!(matches!(err, CliError::ParserNotFound { ref key, .. } if key == "upper"));

        let mut registry = ParserRegistry::new();
        registry.register_named("upper", |_: &FieldKind| -> Box<dyn FlagParser> {
            Box::new(|raw: &str| -> CliResult<Value> { Ok(Value::String(raw.to_uppercase())) })
        });
        let set = FlagSet::compile(&fields, &registry).unwrap();
        let parsed = set.parse(&tokens(&["-c", "abc"]), &MockInteract::new()).unwrap();
        assert_eq!(parsed.values["content"], json!("ABC"));
    }

    #[test]
    fn test_undefined_flag() {
        let err = server_set()
            .parse(&tokens(&["--nope"]), &MockInteract::new())
            .unwrap_err();
        assert!(matches!(err, CliError::UndefinedFlag(ref n) if n == "--nope"));

        // a lone dash is positional
        let parsed = server_set()
            .parse(&tokens(&["-p", "1", "-"]), &MockInteract::new())
            .unwrap();
        assert_eq!(parsed.args, vec!["-"]);
    }
}
