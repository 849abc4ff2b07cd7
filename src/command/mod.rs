//! Command nodes and routing
//!
//! Commands are declared as a nested [`Command`] builder and flattened into
//! a [`CommandTree`] arena. Routing walks the arena from a start node,
//! descending while the next token names a child.
//!
//! ```rust,ignore
//! let root = Command::new("app", "demo application")
//!     .child(help_command("display help"))
//!     .child(
//!         Command::new("build", "build the project")
//!             .argv::<BuildArgs>()
//!             .handler(|ctx| {
//!                 let argv = ctx.argv::<BuildArgs>().cloned().unwrap_or_default();
//!                 ctx.string(format!("building {}\n", argv.target))
//!             }),
//!     );
//! let app = App::new(root)?;
//! ```

pub mod help;
pub(crate) mod hooks;
pub mod tree;


pub use help::{help_command, help_command_fn, HELP_COMMAND};
pub use tree::{CommandId, CommandNode, CommandRef, CommandTree};

use crate::context::Context;
use crate::error::CliResult;
use crate::flag::{Argv, ArgvBinder};

/// Handler and hook signature
pub type Handler = Box<dyn Fn(&mut Context<'_>) -> CliResult<()>>;

/// Declaration of one command and its children
pub struct Command {
    pub(crate) name: String,
    pub(crate) desc: String,
    pub(crate) argv: Option<ArgvBinder>,
    pub(crate) handler: Option<Handler>,
    pub(crate) can_sub_route: bool,
    pub(crate) no_hook: bool,
    pub(crate) before: Option<Handler>,
    pub(crate) after: Option<Handler>,
    pub(crate) children: Vec<Command>,
}

impl Command {
    /// New command that routes into its children
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            argv: None,
            handler: None,
            can_sub_route: true,
            no_hook: false,
            before: None,
            after: None,
            children: Vec::new(),
        }
    }

    /// Bind the command's flags into `T`
    pub fn argv<T: Argv>(mut self) -> Self {
        self.argv = Some(ArgvBinder::of::<T>());
        self
    }

    /// Set the handler. Commands without one print their usage.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> CliResult<()> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Whether tokens may route into children
    pub fn sub_route(mut self, can_sub_route: bool) -> Self {
        self.can_sub_route = can_sub_route;
        self
    }

    /// Keep children as documentation only; tokens are never routed into them
    pub fn no_sub_route(self) -> Self {
        self.sub_route(false)
    }

    /// Run the handler without any before/after hooks
    pub fn no_hook(mut self) -> Self {
        self.no_hook = true;
        self
    }

    /// Hook run before the handler of this command and of every descendant
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> CliResult<()> + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    /// Hook run after the handler of this command and of every descendant
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> CliResult<()> + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }

    /// Append a child command
    pub fn child(mut self, child: Command) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child commands
    pub fn children(mut self, children: impl IntoIterator<Item = Command>) -> Self {
        self.children.extend(children);
        self
    }

    /// Name of the command
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("desc", &self.desc)
            .field("can_sub_route", &self.can_sub_route)
            .field("no_hook", &self.no_hook)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
