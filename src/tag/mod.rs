//! Field annotations
//!
//! Every bindable field carries an annotation string made of sub-tags:
//!
//! ```text
//! cli:"*n,name" usage:"your name" dft:"$USER"
//! pw:"p,password" prompt:"type the password"
//! edit:"MSG_FILE:m,msg" usage:"commit message"
//! ```
//!
//! Exactly one of `cli`, `pw` and `edit` names the flag. `*` marks it
//! required, `!` marks it as a force flag, a lone `-` hides the field.

pub mod compiler;
pub mod multitag;


pub use compiler::{compile, parse_bool, FlagSpec};
pub use multitag::MultiTag;

/// Plain option name list
pub const TAG_CLI: &str = "cli";
/// Password option name list
pub const TAG_PW: &str = "pw";
/// Editor option name list, optionally `FILE:` prefixed
pub const TAG_EDIT: &str = "edit";

/// Usage text
pub const TAG_USAGE: &str = "usage";
/// Default expression
pub const TAG_DEFAULT: &str = "dft";
/// Do not apply the default
pub const TAG_IGNORE_DEFAULT: &str = "ignoreDft";
/// Do not enforce the required marker
pub const TAG_IGNORE_REQUIRED: &str = "ignoreRequired";
/// Display name of the value
pub const TAG_NAME: &str = "name";
/// Prompt text for missing required values
pub const TAG_PROMPT: &str = "prompt";
/// Registered parser key
pub const TAG_PARSER: &str = "parser";
/// Key/value separator for map fields
pub const TAG_SEP: &str = "sep";
/// Hide from help
pub const TAG_HIDDEN: &str = "hidden";

/// Short alias prefix, also the "omit this field" token
pub const DASH_ONE: &str = "-";
/// Long alias prefix
pub const DASH_TWO: &str = "--";
/// Separator between aliases in help text
pub const NAME_SEP: &str = ", ";
/// Default key/value separator of map fields
pub const DEFAULT_MAP_SEP: &str = "=";
