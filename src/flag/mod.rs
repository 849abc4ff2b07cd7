//! Flag specification model
//!
//! An argument record lists its bindable fields as [`FieldDescriptor`]s
//! (name, kind, annotation). The descriptors are compiled into a
//! [`FlagSet`], which parses the tokens of one invocation into a JSON
//! object that is then deserialized into the record.
//!
//! ```rust,ignore
//! #[derive(Default, Serialize, Deserialize)]
//! struct BuildArgs {
//!     help: bool,
//!     target: String,
//!     jobs: u32,
//! }
//!
//! impl Argv for BuildArgs {
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::helper(),
//!             FieldDescriptor::new("target", FieldKind::STRING, r#"cli:"*t,target" usage:"build target""#),
//!             FieldDescriptor::new("jobs", FieldKind::UINT, r#"cli:"j,jobs" dft:"4""#),
//!         ]
//!     }
//! }
//! ```

pub mod set;
pub mod usage;

pub use set::{Flag, FlagSet, ParsedArgs};

use crate::error::{CliError, CliResult};
use crate::parser::ParserKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::any::Any;
use std::fmt;

/// Field name of the built-in help flag
pub const HELP_FIELD: &str = "help";

/// Scalar value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// `bool`
    Bool,
    /// Signed integers
    Int,
    /// Unsigned integers
    Uint,
    /// Floating point
    Float,
    /// `String`
    Str,
}

impl Scalar {
    /// Convert a raw token
    pub fn parse(self, raw: &str) -> Result<Value, String> {
        match self {
            Scalar::Bool => crate::tag::parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| "not a boolean".to_string()),
            Scalar::Int => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| e.to_string()),
            Scalar::Uint => raw
                .parse::<u64>()
                .map(Value::from)
                .map_err(|e| e.to_string()),
            Scalar::Float => {
                let f = raw.parse::<f64>().map_err(|e| e.to_string())?;
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| "not a finite number".to_string())
            }
            Scalar::Str => Ok(Value::String(raw.to_string())),
        }
    }

    /// Placeholder shown in help text
    pub fn hint(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::Int => "int",
            Scalar::Uint => "uint",
            Scalar::Float => "float",
            Scalar::Str => "string",
        }
    }
}

/// Type tag of a bindable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single value; repeated flags keep the last one
    Scalar(Scalar),
    /// Repeated flags append
    List(Scalar),
    /// `key<sep>value` entries
    Map(Scalar),
    /// Value produced by a registered parser
    Custom(ParserKey),
}

impl FieldKind {
    /// `bool` field
    pub const BOOL: FieldKind = FieldKind::Scalar(Scalar::Bool);
    /// Signed integer field
    pub const INT: FieldKind = FieldKind::Scalar(Scalar::Int);
    /// Unsigned integer field
    pub const UINT: FieldKind = FieldKind::Scalar(Scalar::Uint);
    /// Float field
    pub const FLOAT: FieldKind = FieldKind::Scalar(Scalar::Float);
    /// String field
    pub const STRING: FieldKind = FieldKind::Scalar(Scalar::Str);

    /// Field bound through the parser registered as `name`
    pub fn custom(name: &str) -> Self {
        FieldKind::Custom(ParserKey::from_name(name))
    }

    /// Whether the flag is a switch that takes no value token
    pub fn is_bool(&self) -> bool {
        matches!(self, FieldKind::Scalar(Scalar::Bool))
    }

    /// Scalar type of a single raw value
    pub fn scalar(&self) -> Option<Scalar> {
        match self {
            FieldKind::Scalar(s) | FieldKind::List(s) | FieldKind::Map(s) => Some(*s),
            FieldKind::Custom(_) => None,
        }
    }

    /// Placeholder shown in help text
    pub fn hint(&self, sep: &str) -> String {
        match self {
            FieldKind::Scalar(s) => s.hint().to_string(),
            FieldKind::List(s) => format!("{}...", s.hint()),
            FieldKind::Map(s) => format!("key{}{}", sep, s.hint()),
            FieldKind::Custom(key) => key.to_string(),
        }
    }
}

/// One bindable field of an argument record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, also the key the value is bound under
    pub name: String,
    /// Type tag
    pub kind: FieldKind,
    /// Annotation string
    pub tag: String,
}

impl FieldDescriptor {
    /// Describe a field
    pub fn new(name: impl Into<String>, kind: FieldKind, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            tag: tag.into(),
        }
    }

    /// The `-h, --help` force flag; the record needs a `help: bool` field
    pub fn helper() -> Self {
        Self::new(
            HELP_FIELD,
            FieldKind::BOOL,
            r#"cli:"!h,help" usage:"display help information""#,
        )
    }
}

/// An argument record that can be bound from command-line tokens
pub trait Argv: Serialize + DeserializeOwned + Default + 'static {
    /// Bindable fields, in help-text order
    fn fields() -> Vec<FieldDescriptor>;

    /// Checked after binding, before hooks and handler run
    fn validate(&self) -> CliResult<()> {
        Ok(())
    }
}

/// Type-erased binder for one [`Argv`] type
#[derive(Clone, Copy)]
pub struct ArgvBinder {
    fields: fn() -> Vec<FieldDescriptor>,
    bind: fn(Map<String, Value>) -> CliResult<Box<dyn Any>>,
}

impl ArgvBinder {
    /// Binder for `T`
    pub fn of<T: Argv>() -> Self {
        Self {
            fields: T::fields,
            bind: bind_record::<T>,
        }
    }

    /// Field descriptors of the record
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        (self.fields)()
    }

    /// Build the record from parsed values
    pub fn bind(&self, values: Map<String, Value>) -> CliResult<Box<dyn Any>> {
        (self.bind)(values)
    }
}

impl fmt::Debug for ArgvBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgvBinder").finish_non_exhaustive()
    }
}

fn bind_record<T: Argv>(values: Map<String, Value>) -> CliResult<Box<dyn Any>> {
    let mut base = serde_json::to_value(T::default())?;
    let Value::Object(fields) = &mut base else {
        return Err(CliError::SerdeError(
            "argument record must serialize to an object".to_string(),
        ));
    };
    fields.extend(values);

    let record: T = serde_json::from_value(base)?;
    record.validate()?;
    Ok(Box::new(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Record {
        name: String,
        port: u16,
        tags: Vec<String>,
    }

    impl Argv for Record {
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::new("name", FieldKind::STRING, r#"cli:"n""#),
                FieldDescriptor::new("port", FieldKind::UINT, r#"cli:"p""#),
            ]
        }

        fn validate(&self) -> CliResult<()> {
            if self.port == 1 {
                return Err(CliError::execution("port 1 is reserved"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_scalar_parse() {
        assert_eq!(Scalar::Int.parse("-3"), Ok(json!(-3)));
        assert_eq!(Scalar::Uint.parse("3"), Ok(json!(3)));
        assert!(Scalar::Uint.parse("-3").is_err());
        assert_eq!(Scalar::Float.parse("1.5"), Ok(json!(1.5)));
        assert!(Scalar::Float.parse("NaN").is_err());
        assert_eq!(Scalar::Bool.parse("t"), Ok(json!(true)));
        assert_eq!(Scalar::Str.parse("x y"), Ok(json!("x y")));
    }

    #[test]
    fn test_kind_hints() {
        assert_eq!(FieldKind::STRING.hint("="), "string");
        assert_eq!(FieldKind::List(Scalar::Int).hint("="), "int...");
        assert_eq!(FieldKind::Map(Scalar::Str).hint(":"), "key:string");
        assert_eq!(FieldKind::custom("file").hint("="), "file");
        assert!(FieldKind::BOOL.is_bool());
        assert!(!FieldKind::List(Scalar::Bool).is_bool());
    }

    #[test]
    fn test_bind_overlays_defaults() {
        let binder = ArgvBinder::of::<Record>();
        assert_eq!(binder.fields().len(), 2);

        let mut values = Map::new();
        values.insert("port".to_string(), json!(8080));
        let record = binder.bind(values).unwrap();
        let record = record.downcast_ref::<Record>().unwrap();
        assert_eq!(
            record,
            &Record {
                name: String::new(),
                port: 8080,
                tags: vec![],
            }
        );
    }

    #[test]
    fn test_bind_runs_validation() {
        let binder = ArgvBinder::of::<Record>();
        let mut values = Map::new();
        values.insert("port".to_string(), json!(1));
        assert!(binder.bind(values).is_err());
    }

    #[test]
    fn test_bind_rejects_mistyped_value() {
        let binder = ArgvBinder::of::<Record>();
        let mut values = Map::new();
        values.insert("port".to_string(), json!(70000));
        assert!(matches!(binder.bind(values), Err(CliError::SerdeError(_))));
    }
}
