//! Application object: command tree, parser registry and runtime settings

use crate::command::{hooks, Command, CommandRef, CommandTree};
use crate::context::Context;
use crate::error::CliResult;
use crate::flag::FlagSet;
use crate::input::{ConsoleInteract, Interact};
use crate::output::{Color, ColorMode, TtyTarget};
use crate::parser::ParserRegistry;
use std::io::Write;
use tracing::debug;

/// A command-line application
pub struct App {
    tree: CommandTree,
    registry: ParserRegistry,
    color_mode: ColorMode,
    interact: Box<dyn Interact>,
}

impl App {
    /// Build the application from its root command.
    ///
    /// The registry starts with the built-in `json` and `jsonfile` parsers.
    pub fn new(root: Command) -> CliResult<Self> {
        Ok(Self {
            tree: CommandTree::new(root)?,
            registry: ParserRegistry::new(),
            color_mode: ColorMode::default(),
            interact: Box::new(ConsoleInteract::new()),
        })
    }

    /// Replace the parser registry
    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the color mode
    pub fn with_color(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Replace the prompt/password/editor collaborator
    pub fn with_interact(mut self, interact: impl Interact + 'static) -> Self {
        self.interact = Box::new(interact);
        self
    }

    /// Parser registry
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Parser registry, for registration before any parsing starts
    pub fn registry_mut(&mut self) -> &mut ParserRegistry {
        &mut self.registry
    }

    /// Command tree
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Root command
    pub fn root(&self) -> CommandRef<'_> {
        self.tree.get(&self.registry, self.tree.root())
    }

    /// Color mode
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Route `args`, bind flags and run the command, writing to `out`.
    ///
    /// `target` tells whether `out` is a terminal for [`ColorMode::Auto`].
    pub fn execute<I, S>(&self, args: I, out: &mut dyn Write, target: TtyTarget<'_>) -> CliResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
        let (command, consumed) = self.root().sub_route(&tokens);
        debug!(
            target: "argbind::router",
            command = %command.path().join(" "),
            consumed,
            "routed"
        );

        let native_args = tokens[consumed..].to_vec();
        let color = Color::resolve(self.color_mode, target);

        let (argv, args) = match command.node().argv() {
            Some(binder) => {
                let set = FlagSet::compile(&binder.fields(), &self.registry)?;
                let parsed = set.parse(&native_args, self.interact.as_ref())?;
                if parsed.help_requested() {
                    write!(out, "{}", command.usage(&color)?)?;
                    return Ok(());
                }
                (Some(binder.bind(parsed.values)?), parsed.args)
            }
            None => (None, native_args.clone()),
        };

        let mut ctx = Context::new(command, native_args, args, argv, out, color);
        hooks::dispatch(&mut ctx)
    }

    /// Execute against stdout and report errors on stderr.
    ///
    /// Returns the process exit status: 0 on success, 1 on error.
    pub fn run<I, S>(&self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let result = self.execute(args, &mut out, TtyTarget::Stdout);
        let _ = out.flush();

        match result {
            Ok(()) => 0,
            Err(err) => {
                debug!(target: "argbind::app", error = %err, "command failed");
                let color = Color::resolve(self.color_mode, TtyTarget::Stderr);
                eprintln!("{}", color.red(&err.to_string()));
                1
            }
        }
    }

    /// [`run`](Self::run) with the process arguments, program name skipped
    pub fn run_env(&self) -> i32 {
        self.run(std::env::args().skip(1))
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("tree", &self.tree)
            .field("color_mode", &self.color_mode)
            .finish_non_exhaustive()
    }
}
