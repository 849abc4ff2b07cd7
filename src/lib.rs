//! argbind - declarative argument binding and command routing
//!
//! Options are declared as annotated fields of an argument record; commands
//! form a tree of named nodes. A single invocation is routed to a command,
//! its remaining tokens are bound into the record, and the command's handler
//! runs with an execution [`Context`].
//!
//! - **`tag`** - annotation mini-language compiled into flag specifications
//! - **`parser`** - registry of pluggable value parsers
//! - **`flag`** - argument records, token parsing and option help
//! - **`command`** - command tree, routing, hooks and the help command
//! - **`app`** - the application object tying it all together
//! - **`ext`** - config files, daemons, shell completion, file/reader values
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! argbind = "0.3"
//! # Core only:
//! argbind = { version = "0.3", default-features = false }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use argbind::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct HelloArgs {
//!     help: bool,
//!     name: String,
//!     times: u32,
//! }
//!
//! impl Argv for HelloArgs {
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::helper(),
//!             FieldDescriptor::new("name", FieldKind::STRING, r#"cli:"*n,name" usage:"who to greet""#),
//!             FieldDescriptor::new("times", FieldKind::UINT, r#"cli:"t" usage:"repeat" dft:"1""#),
//!         ]
//!     }
//! }
//!
//! fn main() {
//!     let root = Command::new("hello", "greets people")
//!         .argv::<HelloArgs>()
//!         .handler(|ctx| {
//!             let argv = ctx.argv::<HelloArgs>().ok_or_else(|| CliError::execution("no argv"))?;
//!             let line = format!("hello {}\n", argv.name).repeat(argv.times as usize);
//!             ctx.string(line)
//!         });
//!     let app = App::new(root).expect("valid command tree");
//!     std::process::exit(app.run_env());
//! }
//! ```

#![warn(missing_docs)]

pub mod app;
pub mod command;
pub mod context;
pub mod error;
pub mod flag;
pub mod input;
pub mod output;
pub mod parser;
pub mod tag;

/// Config files, daemons, completion and file values (enabled with the `ext` feature)
#[cfg(feature = "ext")]
pub mod ext;

#[cfg(test)]
pub mod test_utils;

pub use app::App;
pub use command::{help_command, Command, CommandRef, CommandTree};
pub use context::Context;
pub use error::{CliError, CliResult};
pub use flag::{Argv, FieldDescriptor, FieldKind, Scalar};
pub use output::{Color, ColorMode, TtyTarget};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::App;
    pub use crate::command::{help_command, Command};
    pub use crate::context::Context;
    pub use crate::error::{CliError, CliResult};
    pub use crate::flag::{Argv, FieldDescriptor, FieldKind, Scalar};
    pub use crate::input::{ConsoleInteract, Interact};
    pub use crate::output::{ColorMode, TtyTarget};
    pub use crate::parser::{ParserKey, ParserRegistry};

    #[cfg(feature = "ext")]
    pub use crate::ext::{File, Reader};
}
