//! Collaborators around the core: config files, daemons, shell completion
//! and the `file` / `reader` value adapters.
//!
//! Enabled by the `ext` feature.

pub mod completion;
pub mod config;
pub mod daemon;
pub mod file;

pub use completion::{gen_completion, install_bash_completion, install_completion, Shell};
pub use config::{
    read_config_from_file, read_json, read_json_config_from_file, read_json_from_file,
};
pub use daemon::{daemon, daemon_response};
pub use file::{File, FileParser, Reader, ReaderParser};

use crate::parser::{ParserKey, ParserRegistry};

/// Registry key of [`FileParser`]
pub const FILE_PARSER: &str = "file";
/// Registry key of [`ReaderParser`]
pub const READER_PARSER: &str = "reader";

/// Register the `file` and `reader` parsers
pub fn register(registry: &mut ParserRegistry) {
    registry.register(ParserKey::named(FILE_PARSER), FileParser::factory);
    registry.register(ParserKey::named(READER_PARSER), ReaderParser::factory);
}
