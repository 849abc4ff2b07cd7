//! Error types for argument binding and command routing

use thiserror::Error;

/// Result type for argbind operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur while compiling annotations, parsing arguments
/// or running a command
#[derive(Error, Debug)]
pub enum CliError {
    /// More than one of the `cli`, `pw`, `edit` sub-tags on one field
    #[error("too many mode tags: only one of `cli`, `pw` or `edit` may be used")]
    TooManyModeTags,

    /// A boolean sub-tag holds something other than a boolean literal
    #[error("invalid boolean `{value}` in sub-tag `{tag}`")]
    InvalidBool {
        /// Sub-tag key
        tag: String,
        /// Offending value
        value: String,
    },

    /// The annotation string itself could not be split into sub-tags
    #[error("malformed annotation `{0}`")]
    MalformedTag(String),

    /// A flag token names no known flag
    #[error("undefined flag {0}")]
    UndefinedFlag(String),

    /// A value-taking flag was the last token
    #[error("flag {0} requires a value")]
    MissingValue(String),

    /// A flag value could not be converted
    #[error("invalid value `{value}` for flag {flag}: {reason}")]
    InvalidValue {
        /// Flag names, joined
        flag: String,
        /// Raw value
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// A required flag was neither given nor defaulted
    #[error("required parameter {0} missing")]
    RequiredMissing(String),

    /// A custom field kind references a parser nobody registered
    #[error("no parser registered as `{key}` for field {field}")]
    ParserNotFound {
        /// Field name
        field: String,
        /// Registry key
        key: String,
    },

    /// Two siblings share a name
    #[error("duplicate command `{0}`")]
    DuplicateCommand(String),

    /// A command path did not resolve
    #[error("command {0} not found")]
    CommandNotFound(String),

    /// Root command has no name
    #[error("root command's name is empty")]
    EmptyRootName,

    /// External editor failure
    #[error("Editor error: {0}")]
    EditorError(String),

    /// Daemon child reported failure; carries the child's line verbatim
    #[error("{0}")]
    DaemonError(String),

    /// Template rendering failure
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error executing a command
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

impl CliError {
    /// Create an execution error with context
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Create a config error with context
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an invalid value error
    pub fn invalid_value(
        flag: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            flag: flag.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::SerdeError(err.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::ExecutionError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_not_found_message() {
        let err = CliError::CommandNotFound("nonexistent".to_string());
        assert_eq!(err.to_string(), "command nonexistent not found");
    }

    #[test]
    fn test_daemon_error_is_verbatim() {
        let err = CliError::DaemonError("listen tcp :80: bind: permission denied".to_string());
        assert_eq!(err.to_string(), "listen tcp :80: bind: permission denied");
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: CliError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, CliError::ExecutionError(ref m) if m == "boom"));
    }
}
